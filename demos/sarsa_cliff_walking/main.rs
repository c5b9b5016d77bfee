use std::error::Error;

use tdcontrol::{gym::CliffWalking, RunConfig, Trainer, ValueTable, ValueTableConfig};

const TRAIN_STEPS: [u64; 1] = [10_000];
const EVAL_STEPS: u64 = 10_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    for train_steps in TRAIN_STEPS {
        let table = ValueTable::new(ValueTableConfig::default())?;
        let mut trainer = Trainer::checked(table, CliffWalking::new())?;
        let config = RunConfig {
            train_steps,
            eval_steps: EVAL_STEPS,
            ..Default::default()
        };

        let train = trainer.train(&config);
        println!("{}", trainer.table());

        let eval = trainer.evaluate(&config);
        println!("{}", tdcontrol::RunSummary { train, eval });
    }

    Ok(())
}
