//! `strata lang` - per-commit language composition and line metrics

use clap::Args;
use strata_backends::LangBackend;
use strata_core::Config;

use super::{emit, MiningArgs};

/// Measure language composition (default) or line metrics for every commit
#[derive(Args, Debug)]
pub struct LangArgs {
    #[command(flatten)]
    mining: MiningArgs,
}

impl LangArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let source = self.mining.source()?;
        let commit_log = self.mining.commit_log(config)?;

        let mut backend = LangBackend::new(source, self.mining.options())?
            .with_commit_source(Box::new(commit_log));
        if let Some(ref root) = config.worktree.root {
            backend = backend.with_worktree_root(root);
        }

        let mut produced = 0usize;
        for item in backend.fetch(self.mining.category.as_deref())? {
            emit(&item?)?;
            produced += 1;
        }
        tracing::info!(produced, "lang run finished");

        Ok(())
    }
}
