//! Pinfield demo - drives a pin field headlessly and logs its draw commands.
//!
//! Usage: `pinfield-demo [config.json] [input]`
//!
//! Without a config file a six-slot loose-box field is used. Set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) to see controller transitions.

use anyhow::{Context, Result};
use pinfield::{
    BoxLooseStyle, Color, DrawCommand, DrawCommandSet, PinField, PinFieldConfig, Size, SlotStyle,
    TextEngine,
};
use tracing_subscriber::EnvFilter;

const CANVAS: Size = Size::new(320.0, 48.0);

fn default_config() -> Result<PinFieldConfig> {
    let style = SlotStyle::BoxLoose(BoxLooseStyle {
        stroke_color: Color::rgb8(158, 158, 158),
        entered_color: Some(Color::rgb8(33, 150, 243)),
        stroke_width: 1.5,
        radius: 6.0,
        gap: 10.0,
        ..Default::default()
    });
    Ok(PinFieldConfig::new(6, style)?)
}

fn load_config(path: Option<&str>) -> Result<PinFieldConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            PinFieldConfig::from_json(&json).with_context(|| format!("parsing config {path}"))
        }
        None => default_config(),
    }
}

fn log_commands(commands: &DrawCommandSet) {
    for cmd in commands.commands() {
        match cmd {
            DrawCommand::StrokeRect { rect, corner_radius, stroke_width, .. } => {
                tracing::info!("stroke rect {:?} radius={} width={}", rect, corner_radius, stroke_width);
            }
            DrawCommand::FillRect { rect, corner_radius, .. } => {
                tracing::info!("fill rect {:?} radius={}", rect, corner_radius);
            }
            DrawCommand::Line { p1, p2, thickness, .. } => {
                tracing::info!("line {:?} -> {:?} thickness={}", p1, p2, thickness);
            }
            DrawCommand::Glyph { text, position, .. } => {
                tracing::info!("glyph {:?} at {:?}", text, position);
            }
        }
    }
}

fn main() -> Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let input = args.next().unwrap_or_else(|| "123".to_string());

    let config = load_config(config_path.as_deref())?
        .with_on_submit(|code| tracing::info!("submitted code {:?}", code));
    tracing::info!("Starting pin field demo with {} slots", config.slot_count());

    let mut field = PinField::new(config, None)?;
    let engine = TextEngine::new();
    let mut commands = DrawCommandSet::new();

    field.type_text(&input);
    tracing::info!("display text {:?}", field.display_text());
    if field.paint(CANVAS, &engine, &mut commands) {
        log_commands(&commands);
    }

    // Unchanged text: the second paint is suppressed.
    let repainted = field.paint(CANVAS, &engine, &mut commands);
    tracing::info!("repaint with unchanged text ran: {}", repainted);

    if field.is_complete() {
        field.submit();
    }
    Ok(())
}
