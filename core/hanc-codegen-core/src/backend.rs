//! The top-level driver contract every back-end implements (spec.md §4.6:
//! "driven by a single top-level `generate(network, config, outDir)`").

use std::path::Path;

use hanc_ir::{CodegenConfig, Network};

use crate::errors::CodegenError;

pub trait Backend {
    /// Emits the full output tree for `network` under `out_dir`, using
    /// `config` for indentation/execution/logging/parametrisation choices.
    /// Files are emitted leaves-first: nested Networks before their
    /// parent, then the root `runnable` (spec.md §5).
    fn generate(
        &self,
        network: &Network,
        config: &CodegenConfig,
        out_dir: &Path,
    ) -> Result<(), CodegenError>;
}
