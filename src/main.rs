// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chordseq::config::presets;
use chordseq::midi::unique_path;
use chordseq::{
    Generation, Key, MidiExporter, ProgressionFile, RenderMode, RhythmStyle, Sequencer,
    SequencerConfig,
};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("chordseq - Chord progression to MIDI renderer");
    println!();
    println!("Usage: chordseq <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  render <FILE> [-o OUT] [--no-clobber]   Render a YAML/TOML progression file");
    println!("  preset <NAME> [OPTIONS]                 Render a built-in preset");
    println!("      --key <K>        Major key (default C)");
    println!("      --tempo <BPM>    Tempo (default 120)");
    println!("      --style <S>      Rhythm style (default straight)");
    println!("      --arpeggio       Broken chords instead of block chords");
    println!("      -o <OUT>         Output file (default <NAME>.mid)");
    println!("      --no-clobber     Append _1, _2, ... instead of overwriting");
    println!("  show <FILE>                             Print resolved chords and warnings");
    println!("  list-styles                             List rhythm styles");
    println!("  list-presets                            List built-in presets");
    println!("  list-keys                               List supported keys");
    println!("  --help                                  Show this help message");
}

/// Value following `flag`, if present
fn option_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{} requires a value", flag)),
        None => Ok(None),
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn output_path(args: &[String], default: PathBuf) -> Result<PathBuf> {
    let path = option_value(args, "-o")?
        .map(PathBuf::from)
        .unwrap_or(default);
    Ok(if has_flag(args, "--no-clobber") {
        unique_path(path)
    } else {
        path
    })
}

fn report(generation: &Generation) {
    for warning in &generation.warnings {
        eprintln!("Warning: {}", warning);
    }
    let names: Vec<&str> = generation
        .chords
        .iter()
        .map(|(_, chord)| chord.name.as_str())
        .collect();
    println!("Chords: {}", names.join(" "));
    println!(
        "Length: {:.2}s ({} events)",
        generation.duration().as_secs_f64(),
        generation.stream.len()
    );
}

fn save(generation: Generation, path: &Path) -> Result<()> {
    MidiExporter::new(generation.stream).save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn render_file(args: &[String]) -> Result<()> {
    let input = args
        .get(2)
        .ok_or_else(|| anyhow!("render requires a progression file"))?;
    let file = ProgressionFile::load(input)?;
    let generation = file.generate()?;
    report(&generation);

    let stem = Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chord_progression".to_string());
    let path = output_path(args, PathBuf::from(format!("{}.mid", stem)))?;
    save(generation, &path)
}

fn render_preset(args: &[String]) -> Result<()> {
    let name = args
        .get(2)
        .ok_or_else(|| anyhow!("preset requires a preset name (see list-presets)"))?;
    let preset = presets::find(name).ok_or_else(|| anyhow!("Unknown preset: {}", name))?;

    let key = option_value(args, "--key")?.unwrap_or("C");
    let tempo: f64 = match option_value(args, "--tempo")? {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid tempo: {}", value))?,
        None => 120.0,
    };
    let style = match option_value(args, "--style")? {
        Some(value) => RhythmStyle::parse(value)
            .ok_or_else(|| anyhow!("Unknown rhythm style: {} (see list-styles)", value))?,
        None => RhythmStyle::default(),
    };
    let mode = if has_flag(args, "--arpeggio") {
        RenderMode::Arpeggio
    } else {
        RenderMode::Block
    };

    let sequencer = Sequencer::new(SequencerConfig::default());
    let generation = sequencer.generate(&preset.progression(1.0), key, tempo, mode, style)?;
    report(&generation);

    let path = output_path(args, PathBuf::from(format!("{}.mid", preset.name)))?;
    save(generation, &path)
}

fn show_file(args: &[String]) -> Result<()> {
    let input = args
        .get(2)
        .ok_or_else(|| anyhow!("show requires a progression file"))?;
    let file = ProgressionFile::load(input)?;
    let generation = file.generate()?;

    println!("{} ({} major, {} BPM)", file.song.name, file.song.key, file.song.tempo);
    let mut sections = generation.sections.iter().peekable();
    for (position, (index, chord)) in generation.chords.iter().enumerate() {
        while let Some(section) = sections.next_if(|s| s.first_chord <= position) {
            println!("  [{} @ {} BPM]", section.name, section.tempo);
        }
        println!(
            "  {:>2}. {:<8} {:<6} {:?}",
            index + 1,
            chord.degree,
            chord.name,
            chord.notes
        );
    }
    for warning in &generation.warnings {
        println!("  ! {}", warning);
    }
    Ok(())
}

fn list_styles() {
    for style in RhythmStyle::ALL {
        let shape: Vec<String> = style
            .sub_beats()
            .iter()
            .map(|b| format!("{:.2}", b.fraction))
            .collect();
        println!("  {:<12} [{}]", style.name(), shape.join(", "));
    }
}

fn list_presets() {
    for preset in presets::all() {
        println!(
            "  {:<12} {:<9} {:<28} {}",
            preset.name,
            preset.genre,
            preset.title,
            preset.summary()
        );
    }
}

fn list_keys() {
    for key in Key::supported() {
        let scale: Vec<&str> = key
            .scale_table()
            .iter()
            .map(|&offset| chordseq::music::note_name(offset))
            .collect();
        println!("  {:<3} {}", key.name(), scale.join(" "));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("chordseq - Chord progression to MIDI renderer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "render" => render_file(&args)?,
        "preset" => render_preset(&args)?,
        "show" => show_file(&args)?,
        "list-styles" => list_styles(),
        "list-presets" => list_presets(),
        "list-keys" => list_keys(),
        "--help" | "-h" => print_usage(),
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}
