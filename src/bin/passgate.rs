use anyhow::Result;
use passgate::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    match action {
        Action::Hash => actions::hash::handle(&globals).await?,
        Action::Verify { digest } => {
            if !actions::verify::handle(&globals, digest).await? {
                std::process::exit(1);
            }
        }
        Action::Policy => actions::policy::handle(&globals)?,
    }

    Ok(())
}
