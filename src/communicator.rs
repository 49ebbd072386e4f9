//! Message passing between workers.
//!
//! Every (worker, side) pair gets its own channel for halo strips, so strips
//! arrive in the order they were sent. Reductions gather to rank 0, which sums
//! in rank order and broadcasts the result back. A worker that bails out
//! drops its endpoints, and every peer waiting on it gets a disconnection.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::{Result, SweError};
use crate::tile_state::Field;
use crate::tile_topology::{Side, TileTopology};
use crate::WorkingPrecision;

const ROOT_RANK: usize = 0;

#[derive(Debug)]
pub struct HaloStrip {
    pub field: Field,
    pub values: Vec<WorkingPrecision>,
}

enum ReduceLinks {
    Root {
        // Indexed by rank - 1
        from_workers: Vec<Receiver<Vec<WorkingPrecision>>>,
        to_workers: Vec<Sender<Vec<WorkingPrecision>>>,
    },
    Worker {
        to_root: Sender<Vec<WorkingPrecision>>,
        from_root: Receiver<Vec<WorkingPrecision>>,
    },
}

pub struct Communicator {
    rank: usize,
    num_workers: usize,

    halo_peers: [Option<usize>; 4],
    // Strips travelling towards the neighbour on a side
    halo_tx: [Option<Sender<HaloStrip>>; 4],
    // Strips arriving from the neighbour on a side
    halo_rx: [Option<Receiver<HaloStrip>>; 4],

    reduce: ReduceLinks,
}

impl Communicator {
    /// Wires up one communicator per rank of `topology`.
    pub fn build(topology: &TileTopology) -> Vec<Communicator> {
        let num_workers = topology.num_workers;

        let mut halo_tx: Vec<[Option<Sender<HaloStrip>>; 4]> =
            (0..num_workers).map(|_| Default::default()).collect();
        let mut halo_rx: Vec<[Option<Receiver<HaloStrip>>; 4]> =
            (0..num_workers).map(|_| Default::default()).collect();

        for rank in 0..num_workers {
            for &side in &Side::ALL {
                if let Some(peer) = topology.neighbor(rank, side) {
                    let (tx, rx) = unbounded();
                    halo_tx[rank][side.index()] = Some(tx);
                    halo_rx[peer][side.opposite().index()] = Some(rx);
                }
            }
        }

        let mut reduce_links = Vec::with_capacity(num_workers);
        let mut from_workers = Vec::with_capacity(num_workers.saturating_sub(1));
        let mut to_workers = Vec::with_capacity(num_workers.saturating_sub(1));
        for _ in 1..num_workers {
            let (up_tx, up_rx) = unbounded();
            let (down_tx, down_rx) = unbounded();
            from_workers.push(up_rx);
            to_workers.push(down_tx);
            reduce_links.push(ReduceLinks::Worker {
                to_root: up_tx,
                from_root: down_rx,
            });
        }
        reduce_links.insert(
            ROOT_RANK,
            ReduceLinks::Root {
                from_workers,
                to_workers,
            },
        );

        halo_tx
            .into_iter()
            .zip(halo_rx)
            .zip(reduce_links)
            .enumerate()
            .map(|(rank, ((halo_tx, halo_rx), reduce))| Communicator {
                rank,
                num_workers,
                halo_peers: topology.neighbors(rank),
                halo_tx,
                halo_rx,
                reduce,
            })
            .collect()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// The worker that reports on behalf of the whole run.
    pub fn is_primary(&self) -> bool {
        self.rank == ROOT_RANK
    }

    pub fn send_halo(&self, side: Side, strip: HaloStrip) -> Result<()> {
        let tx = self.halo_tx[side.index()]
            .as_ref()
            .ok_or_else(|| self.no_neighbor(side))?;

        tx.send(strip)
            .map_err(|_| self.hung_up(self.halo_peer_name(side), "halo receiver is gone"))
    }

    pub fn recv_halo(&self, side: Side, field: Field) -> Result<Vec<WorkingPrecision>> {
        let rx = self.halo_rx[side.index()]
            .as_ref()
            .ok_or_else(|| self.no_neighbor(side))?;

        let strip = rx
            .recv()
            .map_err(|_| self.hung_up(self.halo_peer_name(side), "halo sender is gone"))?;

        if strip.field != field {
            return Err(self.hung_up(
                self.halo_peer_name(side),
                &format!(
                    "expected {} strip, received {}",
                    field.name(),
                    strip.field.name()
                ),
            ));
        }

        Ok(strip.values)
    }

    /// Element-wise sum of `partial` over all workers, identical on every rank.
    pub fn all_reduce_sum(&self, partial: &[WorkingPrecision]) -> Result<Vec<WorkingPrecision>> {
        match &self.reduce {
            ReduceLinks::Root {
                from_workers,
                to_workers,
            } => {
                let mut total = partial.to_vec();

                for (idx, rx) in from_workers.iter().enumerate() {
                    let peer = format!("rank {}", idx + 1);
                    let contribution = rx
                        .recv()
                        .map_err(|_| self.hung_up(peer.clone(), "reduction sender is gone"))?;

                    if contribution.len() != total.len() {
                        return Err(self.hung_up(
                            peer,
                            &format!(
                                "reduction length mismatch: {} vs {}",
                                contribution.len(),
                                total.len()
                            ),
                        ));
                    }

                    total
                        .iter_mut()
                        .zip(contribution)
                        .for_each(|(acc, value)| *acc += value);
                }

                for (idx, tx) in to_workers.iter().enumerate() {
                    tx.send(total.clone()).map_err(|_| {
                        self.hung_up(format!("rank {}", idx + 1), "reduction receiver is gone")
                    })?;
                }

                Ok(total)
            }
            ReduceLinks::Worker { to_root, from_root } => {
                let root = format!("rank {}", ROOT_RANK);

                to_root
                    .send(partial.to_vec())
                    .map_err(|_| self.hung_up(root.clone(), "reduction receiver is gone"))?;

                from_root
                    .recv()
                    .map_err(|_| self.hung_up(root, "reduction broadcast is gone"))
            }
        }
    }

    /// Returns once every worker has called it.
    pub fn barrier(&self) -> Result<()> {
        self.all_reduce_sum(&[]).map(|_| ())
    }

    fn halo_peer_name(&self, side: Side) -> String {
        match self.halo_peers[side.index()] {
            Some(peer) => format!("rank {} ({:?} neighbour)", peer, side),
            None => format!("{:?} neighbour", side),
        }
    }

    fn no_neighbor(&self, side: Side) -> SweError {
        self.hung_up(
            self.halo_peer_name(side),
            "no neighbour on this side of the tile",
        )
    }

    fn hung_up(&self, peer: String, detail: &str) -> SweError {
        SweError::Communication {
            rank: self.rank,
            peer,
            detail: detail.to_owned(),
        }
    }
}
