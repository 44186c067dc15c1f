use std::io::BufWriter;
use std::io::Write;
use std::process;

use sim_lib::flags::CacheSimArgs;
use sim_lib::run_wrapper;
use sim_lib::run_wrapper::SimulationParams;

fn main() {
    env_logger::init();

    let args = match CacheSimArgs::from_env() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let params = SimulationParams::from(args);
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Err(err) = run_wrapper::run(&params, &mut out) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
    if let Err(err) = out.flush() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
