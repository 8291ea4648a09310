use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use pipeline_synth as synth;
use pipeline_synth::{
    BodyPart, Command, CommandKind, Coords, DatasetGenerator, DatasetVariant, ForceChange,
    ForceDirection, GeneratorConfig, MoveGoal, Record, RelativeForce,
};

#[derive(Parser, Debug)]
#[command(
    name = "synth",
    version,
    about = "Massage robot instruction/pipeline dataset generator",
    disable_help_subcommand = true
)]
struct Cli {
    /// YAML generator config (defaults reproduce the published datasets)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Variant {
    Context,
    Flat,
}

impl From<Variant> for DatasetVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Context => DatasetVariant::Contextual,
            Variant::Flat => DatasetVariant::Flat,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Direction {
    Increase,
    Decrease,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a dataset file
    Generate {
        #[arg(long, value_enum, default_value = "context")]
        variant: Variant,
        /// Number of records
        #[arg(long, default_value_t = 5000usize)]
        samples: usize,
        /// Base seed; sample i uses a seed derived from (seed, i)
        #[arg(long)]
        seed: u64,
        /// Worker threads (output does not depend on this)
        #[arg(long, default_value_t = 1usize)]
        workers: usize,
        /// Output path
        #[arg(long, default_value = "massage_robot_dataset.json")]
        out: PathBuf,
        /// Write JSON Lines instead of a pretty JSON array
        #[arg(long, action = ArgAction::SetTrue)]
        jsonl: bool,
    },
    /// Print a few records to stdout
    Preview {
        #[arg(long, value_enum, default_value = "context")]
        variant: Variant,
        #[arg(long, default_value_t = 3usize)]
        count: usize,
        #[arg(long, default_value_t = 0u64)]
        seed: u64,
    },
    /// Print the pipeline of a single command
    Compile {
        /// Command type, e.g. move or change_force_relative
        kind: CommandKind,
        /// Body part (detect, move, automatic_massage)
        #[arg(long)]
        part: Option<BodyPart>,
        /// Literal coordinates x,y,z (move)
        #[arg(long, allow_hyphen_values = true)]
        coords: Option<Coords>,
        /// Percentage (change_force_relative)
        #[arg(long)]
        percent: Option<u8>,
        #[arg(long, value_enum, default_value = "increase")]
        direction: Direction,
        /// New force value (change_force_absolute)
        #[arg(long, allow_hyphen_values = true)]
        value: Option<f64>,
    },
    /// Print the capability documentation and command registry
    Catalog,
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            variant,
            samples,
            seed,
            workers,
            out,
            jsonl,
        } => generate(
            cli.config.as_deref(),
            variant.into(),
            samples,
            seed,
            workers,
            &out,
            jsonl,
        ),
        Commands::Preview {
            variant,
            count,
            seed,
        } => preview(cli.config.as_deref(), variant.into(), count, seed),
        Commands::Compile {
            kind,
            part,
            coords,
            percent,
            direction,
            value,
        } => {
            let command = build_command(kind, part, coords, percent, direction, value)?;
            for line in synth::compile_lines(&command) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Catalog => catalog(),
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_generator(config: Option<&Path>) -> Result<DatasetGenerator> {
    let config = match config {
        Some(path) => synth::load_config_file(path)?,
        None => GeneratorConfig::default(),
    };
    DatasetGenerator::new(config).context("building dataset generator")
}

fn generate(
    config: Option<&Path>,
    variant: DatasetVariant,
    samples: usize,
    seed: u64,
    workers: usize,
    out: &Path,
    jsonl: bool,
) -> Result<()> {
    let generator = load_generator(config)?;
    let records = generator
        .generate(variant, samples, seed, workers)
        .context("dataset generation stopped")?;

    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut w = BufWriter::new(file);
    if jsonl {
        for record in &records {
            serde_json::to_writer(&mut w, record)?;
            w.write_all(b"\n")?;
        }
    } else {
        write_pretty(&mut w, &records)?;
    }
    w.flush()?;

    let manifest_path = manifest_path(out);
    let manifest = Manifest {
        format: if jsonl { "jsonl" } else { "json" }.to_string(),
        version: 1,
        variant: variant.to_string(),
        samples: records.len(),
        seed,
        workers,
        config: config.map(|p| p.display().to_string()),
        generated_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
    };
    let manifest_file = File::create(&manifest_path)
        .with_context(|| format!("creating {}", manifest_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(manifest_file), &manifest)?;

    info!(
        out = %out.display(),
        records = records.len(),
        "dataset written"
    );
    println!("Dataset generated and saved to {}", out.display());
    Ok(())
}

/// Pretty JSON with a four-space indent.
fn write_pretty<W: Write, T: Serialize>(w: W, value: &T) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(w, formatter);
    value.serialize(&mut ser)?;
    Ok(())
}

fn manifest_path(out: &Path) -> PathBuf {
    let mut name = out.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".manifest.json");
    out.with_file_name(name)
}

fn preview(config: Option<&Path>, variant: DatasetVariant, count: usize, seed: u64) -> Result<()> {
    let generator = load_generator(config)?;
    let records: Vec<Record> = generator.generate(variant, count, seed, 1)?;
    let stdout = io::stdout();
    let mut w = stdout.lock();
    for record in &records {
        match record {
            Record::Contextual(r) => {
                writeln!(w, "--- history ---\n{}", r.conversation_history())?;
                writeln!(w, "--- input ---\n{}", r.latest_user_input())?;
                writeln!(w, "--- response ---\n{}\n", r.response())?;
            }
            Record::Flat(r) => {
                writeln!(w, "--- input ---\n{}", r.input())?;
                writeln!(w, "--- response ---\n{}\n", r.response().join("\n"))?;
            }
        }
    }
    Ok(())
}

fn build_command(
    kind: CommandKind,
    part: Option<BodyPart>,
    coords: Option<Coords>,
    percent: Option<u8>,
    direction: Direction,
    value: Option<f64>,
) -> Result<Command> {
    let need_part = || part.ok_or_else(|| anyhow!("{kind} needs --part"));
    let command = match kind {
        CommandKind::Start => Command::Start,
        CommandKind::Stop => Command::Stop,
        CommandKind::Home => Command::Home,
        CommandKind::Detect => Command::Detect(need_part()?),
        CommandKind::Move => match (part, coords) {
            (Some(part), None) => Command::Move(MoveGoal::BodyPart(part)),
            (None, Some(coords)) => Command::Move(MoveGoal::Coords(coords)),
            _ => bail!("move needs exactly one of --part or --coords"),
        },
        CommandKind::ChangeForceRelative => {
            let percent = percent.ok_or_else(|| anyhow!("{kind} needs --percent"))?;
            let direction = match direction {
                Direction::Increase => ForceDirection::Increase,
                Direction::Decrease => ForceDirection::Decrease,
            };
            Command::ChangeForce(ForceChange::Relative(RelativeForce::new(percent, direction)?))
        }
        CommandKind::ChangeForceAbsolute => {
            let value = value.ok_or_else(|| anyhow!("{kind} needs --value"))?;
            if !value.is_finite() {
                bail!("--value must be a finite number");
            }
            Command::ChangeForce(ForceChange::Absolute(value))
        }
        CommandKind::AutomaticMassage => Command::AutomaticMassage(need_part()?),
    };
    Ok(command)
}

fn catalog() -> Result<()> {
    print!("{}", synth::CAPABILITIES);
    println!();
    println!("Command types:");
    for spec in &synth::REGISTRY {
        let forms = if spec.has_ambiguous_form() {
            "explicit, elliptical"
        } else {
            "explicit"
        };
        println!("    {}\t{}", spec.kind, forms);
    }
    println!();
    let parts: Vec<&str> = BodyPart::ALL.iter().map(BodyPart::as_str).collect();
    println!("Body parts: {}", parts.join(", "));
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct Manifest {
    format: String,
    version: u32,
    variant: String,
    samples: usize,
    seed: u64,
    workers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<String>,
    generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "synth", "generate", "--variant", "flat", "--seed", "7", "--samples", "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                variant,
                seed,
                samples,
                ..
            } => {
                assert_eq!(variant, Variant::Flat);
                assert_eq!(seed, 7);
                assert_eq!(samples, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_compile_move_to_coordinates() {
        let cli = Cli::try_parse_from(["synth", "compile", "move", "--coords", "-3,4,20"]).unwrap();
        let Commands::Compile {
            kind,
            part,
            coords,
            percent,
            direction,
            value,
        } = cli.command
        else {
            panic!("expected compile");
        };
        let command = build_command(kind, part, coords, percent, direction, value).unwrap();
        assert_eq!(synth::compile_lines(&command), vec!["move_to([-3, 4, 20])"]);
    }

    #[test]
    fn test_compile_requires_parameters() {
        assert!(build_command(CommandKind::Detect, None, None, None, Direction::Increase, None).is_err());
        assert!(build_command(
            CommandKind::Move,
            Some(BodyPart::Neck),
            Some(Coords::new(0, 0, 0).unwrap()),
            None,
            Direction::Increase,
            None
        )
        .is_err());
        let command = build_command(
            CommandKind::ChangeForceRelative,
            None,
            None,
            Some(30),
            Direction::Decrease,
            None,
        )
        .unwrap();
        assert_eq!(
            synth::compile_lines(&command),
            vec!["change_force('relative', -0.3)"]
        );
    }

    #[test]
    fn test_manifest_path() {
        assert_eq!(
            manifest_path(Path::new("out/data.json")),
            PathBuf::from("out/data.json.manifest.json")
        );
    }

    #[test]
    fn test_pretty_output_uses_four_spaces() {
        let mut buf = Vec::new();
        write_pretty(&mut buf, &vec![1, 2]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[\n    1,\n    2\n]");
    }
}
