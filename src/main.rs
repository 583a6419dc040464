use std::path::PathBuf;

use stitchkit::{init_logging, load_config, EditorSession, ResourceKind, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    // Optional config path as the first argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    init_logging(&config.logging)?;
    tracing::info!("StitchKit {} (built {})", VERSION, BUILD_DATE);

    let session = EditorSession::new(config)?;
    let catalog = session.store().catalog();
    tracing::info!(
        designs = catalog.len(ResourceKind::Design),
        images = catalog.len(ResourceKind::Image),
        "Catalog ready"
    );

    let state = session.snapshot();
    tracing::info!(
        viewport = %state.view.viewport,
        edit_mode = ?state.editor.edit_mode,
        "Document initialized, waiting for engines"
    );

    Ok(())
}
