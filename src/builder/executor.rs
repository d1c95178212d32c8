//! Build execution.

use anyhow::Result;

use crate::builder::plan::BuildPlan;
use crate::core::errors::{ExitCode, StageError};
use crate::core::toolchain::ToolchainEnv;
use crate::util::process::CommandRunner;

/// Runs a [`BuildPlan`] with the installed toolchain.
pub struct BuildExecutor<'a> {
    runner: &'a dyn CommandRunner,
    env: &'a ToolchainEnv,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, env: &'a ToolchainEnv) -> Self {
        BuildExecutor { runner, env }
    }

    /// Run the compile, streaming its output.
    pub fn execute(&self, plan: &BuildPlan) -> Result<()> {
        let cmd = plan.to_process(self.env)?;
        tracing::info!("Running: {}", plan.display());

        match self.runner.run(&cmd)? {
            Some(0) => Ok(()),
            code => Err(StageError::CompileFailed {
                command: plan.display(),
                code: ExitCode(code),
            }
            .into()),
        }
    }
}
