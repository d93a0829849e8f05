use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::io::{HumanProtocol, MachineProtocol};
use crate::models::ProtocolPart;

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to generate machine-readable output
    pub generate_machine: bool,
    /// Whether to generate human-readable output
    pub generate_human: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            generate_machine: true,
            generate_human: true,
        }
    }
}

/// Result of rendering
#[derive(Debug)]
pub struct RenderResult {
    /// Path to machine output (if generated)
    pub machine_path: Option<PathBuf>,
    /// Path to human output (if generated)
    pub human_path: Option<PathBuf>,
}

/// Render segmented parts
///
/// Produces two output views:
/// 1. Machine view: JSON with ordered parts, speakers and a summary
/// 2. Human view: numbered headers followed by their bodies
pub fn render_parts(
    parts: &[ProtocolPart],
    meeting_id: Option<u64>,
    machine_output: Option<&Path>,
    human_output: Option<&Path>,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let mut result = RenderResult {
        machine_path: None,
        human_path: None,
    };

    if config.generate_machine {
        if let Some(path) = machine_output {
            info!("Writing machine output to {:?}", path);
            MachineProtocol::from_parts(meeting_id, parts).write_json(path)?;
            result.machine_path = Some(path.to_path_buf());
        }
    }

    if config.generate_human {
        if let Some(path) = human_output {
            info!("Writing human output to {:?}", path);
            HumanProtocol::new(parts).write_file(path)?;
            result.human_path = Some(path.to_path_buf());
        }
    }

    Ok(result)
}
