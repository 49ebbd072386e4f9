//! Fixed pool of workers, one thread per tile, all running the same program.

use std::thread;

use tracing::{debug, error};

use crate::communicator::Communicator;
use crate::error::{Result, SweError};
use crate::global_grid::GlobalGrid;
use crate::tile_topology::{TileDescriptor, TileTopology};

/// What a single worker owns for the lifetime of the run.
pub struct WorkerContext {
    pub comm: Communicator,
    pub tile: TileDescriptor,
}

/// Runs `worker` once per tile of `topology` and gathers the per-rank results.
///
/// The grid is partitioned before any thread starts, so an impossible layout
/// fails without spawning anything. If any worker fails, the others lose
/// their connection to it and fail too; the error returned is the root cause
/// rather than the knock-on communication failures.
pub fn launch<T, F>(topology: &TileTopology, grid: &GlobalGrid, worker: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(WorkerContext) -> Result<T> + Sync,
{
    let tiles = topology.decompose(grid)?;
    for tile in &tiles {
        debug!(
            rank = tile.rank,
            row = tile.row,
            col = tile.col,
            "tile covers i {}..={}, j {}..={}",
            tile.i_range.start,
            tile.i_range.end,
            tile.j_range.start,
            tile.j_range.end
        );
    }

    let comms = Communicator::build(topology);
    let worker = &worker;

    let outcomes: Vec<Result<T>> = thread::scope(|scope| {
        let handles: Vec<_> = comms
            .into_iter()
            .zip(tiles)
            .map(|(comm, tile)| {
                let rank = tile.rank;
                let handle = scope.spawn(move || worker(WorkerContext { comm, tile }));
                (rank, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(SweError::WorkerPanicked { rank }))
            })
            .collect()
    });

    let mut root_cause: Option<SweError> = None;
    let mut results = Vec::with_capacity(outcomes.len());

    for (rank, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => results.push(value),
            Err(err) => {
                error!(rank, "worker failed: {}", err);
                let replace = match &root_cause {
                    None => true,
                    Some(current) => current.is_communication() && !err.is_communication(),
                };
                if replace {
                    root_cause = Some(err);
                }
            }
        }
    }

    match root_cause {
        Some(err) => Err(err),
        None => Ok(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(im: usize, jm: usize) -> GlobalGrid {
        GlobalGrid {
            im,
            jm,
            dx: 1.0,
            dy: 1.0,
            g: 9.8,
            dt: 0.1,
        }
    }

    #[test]
    fn results_come_back_in_rank_order() {
        let topology = TileTopology::new(6, false).unwrap();
        let ranks = launch(&topology, &grid(12, 12), |ctx| {
            ctx.comm.barrier()?;
            Ok(ctx.tile.rank)
        })
        .unwrap();

        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn invalid_layout_fails_before_launch() {
        let topology = TileTopology::new(4, false).unwrap();
        let result = launch(&topology, &grid(1, 8), |_| Ok(()));
        assert!(matches!(result, Err(SweError::InvalidPartition { .. })));
    }

    #[test]
    fn failing_worker_aborts_everyone_with_the_root_cause() {
        let topology = TileTopology::new(4, false).unwrap();
        let result: Result<Vec<()>> = launch(&topology, &grid(8, 8), |ctx| {
            if ctx.tile.rank == 3 {
                return Err(SweError::InvalidParameter("boom".to_owned()));
            }
            // Would block forever if the failure did not propagate.
            ctx.comm.barrier()?;
            ctx.comm.barrier()
        });

        match result {
            Err(SweError::InvalidParameter(msg)) => assert_eq!(msg, "boom"),
            other => panic!("expected the root cause, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn panicking_worker_is_reported() {
        let topology = TileTopology::new(2, false).unwrap();
        let result: Result<Vec<()>> = launch(&topology, &grid(4, 4), |ctx| {
            if ctx.tile.rank == 1 {
                panic!("worker blew up");
            }
            ctx.comm.barrier()
        });

        assert!(matches!(result, Err(SweError::WorkerPanicked { rank: 1 })));
    }
}
