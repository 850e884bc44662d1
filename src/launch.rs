//! Batch launch recipes.
//!
//! The Slurm command lines used to run `kmer_hash` on a cluster, kept as typed
//! values that render back to the exact command. Nothing here runs them.

use std::fmt;

use serde::Serialize;

use crate::run::RunMode;

/// An `salloc ... srun ...` invocation of a k-mer binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlurmLaunch {
    pub nodes: u32,
    pub account: String,
    /// Wall-clock limit as Slurm spells it, e.g. `10:00`.
    pub time_limit: String,
    pub queue: String,
    pub qos: String,
    /// Node feature constraint, e.g. `haswell`.
    pub constraint: String,
    pub tasks: u32,
    pub binary: String,
    pub input: String,
    pub mode: Option<RunMode>,
}

impl SlurmLaunch {
    /// Interactive debug allocation on Haswell nodes under account `mp309`.
    fn debug_haswell(nodes: u32, tasks: u32, input: &str) -> Self {
        Self {
            nodes,
            account: "mp309".to_string(),
            time_limit: "10:00".to_string(),
            queue: "debug".to_string(),
            qos: "interactive".to_string(),
            constraint: "haswell".to_string(),
            tasks,
            binary: "kmer_hash".to_string(),
            input: input.to_string(),
            mode: Some(RunMode::Verbose),
        }
    }

    /// 32 ranks over 8 nodes on the small test dataset.
    #[must_use]
    pub fn test_dataset() -> Self {
        Self::debug_haswell(8, 32, "$SCRATCH/my_datasets/test.txt")
    }

    /// 2 ranks on one node on the synthetic human chromosome 14 dataset.
    #[must_use]
    pub fn human_chr14() -> Self {
        Self::debug_haswell(1, 2, "$SCRATCH/my_datasets/human-chr14-synthetic.txt")
    }
}

impl fmt::Display for SlurmLaunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "salloc -N {} -A {} -t {} -q {} --qos={} -C {} srun -N {} -n {} ./{} {}",
            self.nodes,
            self.account,
            self.time_limit,
            self.queue,
            self.qos,
            self.constraint,
            self.nodes,
            self.tasks,
            self.binary,
            self.input,
        )?;
        match self.mode {
            Some(RunMode::Verbose) => write!(f, " verbose"),
            Some(RunMode::Test) => write!(f, " test"),
            Some(RunMode::Normal) | None => Ok(()),
        }
    }
}

/// Both recorded launches.
#[must_use]
pub fn recorded() -> Vec<SlurmLaunch> {
    vec![SlurmLaunch::test_dataset(), SlurmLaunch::human_chr14()]
}
