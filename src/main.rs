use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use swe2d_rs_lib::{run_simulation, CsvFieldSink, FieldSink, ModelParameters, NullSink};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run() -> swe2d_rs_lib::Result<()> {
    let model_params = ModelParameters::new("Config")?;
    info!("Model params: {:?}", model_params);

    let sink: Box<dyn FieldSink> = if model_params.output_interval > 0 {
        Box::new(CsvFieldSink::new(&model_params.output_dir)?)
    } else {
        Box::new(NullSink)
    };

    let summary = run_simulation(&model_params, sink.as_ref())?;

    if let Some(last) = summary.reports.last() {
        info!(
            "Finished {} steps: mean h = {:.8E}, mean ke = {:.8E}",
            last.step, last.mean_h, last.mean_ke
        );
    }

    Ok(())
}

fn main() {
    setup_logging();

    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
