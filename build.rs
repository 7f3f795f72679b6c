use anyhow::Result;
use vergen::EmitBuilder;

// Short git SHA for `--version`
fn main() -> Result<()> {
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
