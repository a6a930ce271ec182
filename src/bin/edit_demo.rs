//! Scripted editing walkthrough against an in-memory world.
//!
//! Usage: cargo run --bin edit_demo -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Edit limits as JSON (default: built-in defaults)
//!   --size <N>        Edge length of the demo selection (default: 8)
//!   --limit <N>       Change limit for the session (default: from config)

use std::path::PathBuf;

use glam::IVec3;

use voxedit::block::{id, BaseBlock};
use voxedit::clipboard::Clipboard;
use voxedit::context::UserContext;
use voxedit::core::{logging, EditConfig};
use voxedit::pattern::Pattern;
use voxedit::world::MemoryWorld;

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let size = parse_i32_arg(&args, "--size").unwrap_or(8).max(1);
    let config = match parse_str_arg(&args, "--config") {
        Some(path) => match EditConfig::load_sync(&PathBuf::from(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => EditConfig::default(),
    };

    if let Err(e) = run(&config, size, parse_i64_arg(&args, "--limit")) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &EditConfig, size: i32, limit: Option<i64>) -> voxedit::core::Result<()> {
    let mut world = MemoryWorld::new(127);
    let mut user = UserContext::new(config);
    if let Some(limit) = limit {
        user.set_change_limit(config, limit, false)?;
    }

    println!("=== Voxedit Demo ===");
    let selector = user.selector_mut();
    selector.select_primary(IVec3::new(0, 10, 0));
    println!("{}", selector.explain_primary());
    selector.select_secondary(IVec3::new(size - 1, 10 + size - 1, size - 1));
    println!("{}", selector.explain_secondary());
    let region = user.selection()?.clone();

    // Fill, then hollow
    let mut session = user.edit_session(&mut world, None, config);
    let stone = Pattern::Single(BaseBlock::new(id::STONE));
    let filled = session.set_blocks(&region, &stone);
    let hollowed = filled.and_then(|n| {
        println!("set: {} blocks", n);
        session.hollow_out_region(&region, 1, &Pattern::Single(BaseBlock::AIR))
    });
    println!("hollow: {:?}", hollowed.map_err(|e| e.to_string()));
    println!("session changed {} blocks", user.remember(session));

    // Copy, rotate and paste beside the original
    let session = user.edit_session(&mut world, None, config);
    let mut clipboard = Clipboard::copy(&session, &region, region.min());
    drop(session);
    clipboard.rotate_2d(90)?;
    user.set_clipboard(clipboard);

    let mut session = user.edit_session(&mut world, None, config);
    let pasted = user.clipboard()?.paste(&mut session, region.min() + IVec3::new(size + 2, 0, 0), true, false)?;
    println!("paste: {} blocks", pasted);
    user.remember(session);

    let session = user.edit_session(&mut world, None, config);
    for (filter, count) in session.block_distribution(&region, false) {
        println!("  {:>6}  {}", count, id::name(filter.id));
    }
    drop(session);

    // Undo both sessions
    while let Some(undone) = user.undo(&mut world)? {
        println!("undo: {} blocks", undone.len());
    }
    println!("blocks left in world: {}", world.block_count());
    Ok(())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_i64_arg(args: &[String], flag: &str) -> Option<i64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
