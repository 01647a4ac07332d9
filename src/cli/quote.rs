use crate::prompt::motivational_quotes;
use rand::Rng;

pub fn execute() -> anyhow::Result<()> {
    let quotes = motivational_quotes();
    let pick = rand::thread_rng().gen_range(0..quotes.len());
    println!("{}", quotes[pick]);
    Ok(())
}
