#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use blockfall::{Command, EngineSettings, FrameView, RandomizerKind, Simulation, Stimulus};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
#[cfg(not(target_arch = "wasm32"))]
use tokio::io::{AsyncBufReadExt, BufReader};

/// Drives the falling-block engine from a terminal, either for a fixed
/// number of ticks or in real time with commands read from stdin.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug, Clone)]
struct Opts {
    #[arg(long, default_value_t = 10)]
    cols: usize,
    /// Visible rows
    #[arg(long, default_value_t = 12)]
    rows: usize,
    #[arg(long, default_value_t = 0)]
    buffer_rows: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1000.0)]
    gravity_ms: f32,
    /// Headless mode: number of gravity ticks to run
    #[arg(long, default_value_t = 40)]
    ticks: usize,
    /// Headless mode: comma separated commands, one applied before each tick
    #[arg(long, value_delimiter = ',')]
    commands: Vec<String>,
    /// Tick on a real timer and read commands (and `resize C R`) from stdin
    #[arg(long)]
    realtime: bool,
    /// Print one JSON frame per line instead of text
    #[arg(long)]
    json: bool,
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let settings = EngineSettings {
        gravity_ms: opts.gravity_ms,
        buffer_rows: opts.buffer_rows,
        randomizer: RandomizerKind::SevenBag,
        seed: opts.seed,
    };
    let mut sim = Simulation::new(&settings, opts.cols, opts.rows);
    if opts.realtime {
        run_realtime(&mut sim, &opts).await
    } else {
        run_headless(&mut sim, &opts)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(sim: &mut Simulation, opts: &Opts) -> anyhow::Result<()> {
    let commands = opts
        .commands
        .iter()
        .map(|c| c.parse::<Command>().map_err(anyhow::Error::msg))
        .collect::<anyhow::Result<Vec<_>>>()?;
    for i in 0..opts.ticks {
        if let Some(command) = commands.get(i) {
            sim.command(*command);
        }
        sim.tick();
        print_frame(sim, opts.json)?;
    }
    Ok(())
}

/// All stimuli funnel into this one task; the simulation is never shared.
#[cfg(not(target_arch = "wasm32"))]
async fn run_realtime(sim: &mut Simulation, opts: &Opts) -> anyhow::Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Stimulus>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_line(&line) {
                Ok(Some(stimulus)) => {
                    if tx.send(stimulus).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{e}"),
            }
        }
    });

    let period = Duration::from_secs_f32(opts.gravity_ms.max(1.0) / 1000.0);
    let mut gravity = tokio::time::interval(period);
    loop {
        let stimulus = tokio::select! {
            _ = gravity.tick() => Stimulus::Tick,
            Some(stimulus) = rx.recv() => stimulus,
            else => break,
        };
        if matches!(stimulus, Stimulus::Resize { .. }) {
            gravity.reset();
        }
        sim.handle(stimulus);
        print_frame(sim, opts.json)?;
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_line(line: &str) -> anyhow::Result<Option<Stimulus>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    if head.eq_ignore_ascii_case("resize") {
        let cols = words
            .next()
            .ok_or_else(|| anyhow::anyhow!("resize needs cols and rows"))?
            .parse()?;
        let rows = words
            .next()
            .ok_or_else(|| anyhow::anyhow!("resize needs cols and rows"))?
            .parse()?;
        return Ok(Some(Stimulus::Resize { cols, rows }));
    }
    let command = head.parse::<Command>().map_err(anyhow::Error::msg)?;
    Ok(Some(Stimulus::Command(command)))
}

#[cfg(not(target_arch = "wasm32"))]
fn print_frame(sim: &Simulation, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(&sim.snapshot())?);
        return Ok(());
    }
    let view: FrameView = sim.snapshot();
    let mut out = String::with_capacity((view.cols + 1) * view.rows + 1);
    for (y, row) in sim.composited_board().iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            let is_active = view.active.iter().any(|p| p.x as usize == x && p.y as usize == y);
            out.push(match cell {
                0 => '.',
                _ if is_active => '@',
                v => char::from_digit(u32::from(v), 36).unwrap_or('#'),
            });
        }
        out.push('\n');
    }
    println!("{out}");
    Ok(())
}
