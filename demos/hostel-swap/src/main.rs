use roomswap::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A demo input file: an optional `config` object next to the snapshot's
/// `rooms` and `requests`.
#[derive(Default, Serialize, Deserialize)]
struct DemoInput {
    #[serde(default)]
    config: PassConfig,
    #[serde(flatten)]
    snapshot: SwapSnapshot,
}

/// Twenty rooms, R101..R120, held by Student_A..Student_T, with one
/// two-way swap, one three-way swap and two requests that go nowhere.
fn seeded_hostel() -> DemoInput {
    let rooms = (0..20u8)
        .map(|i| {
            RoomEntry::new(
                format!("R{}", 101 + u32::from(i)).as_str(),
                format!("Student_{}", char::from(b'A' + i)).as_str(),
            )
        })
        .collect();

    let requests = [
        ("R101", "R102"),
        ("R102", "R101"),
        ("R105", "R106"),
        ("R106", "R107"),
        ("R107", "R105"),
        ("R110", "R111"),
        ("R111", "R112"),
        ("R115", "R116"),
    ]
    .into_iter()
    .map(|(from, to)| SwapEdge::new(from, to))
    .collect();

    DemoInput {
        config: PassConfig::default(),
        snapshot: SwapSnapshot { rooms, requests },
    }
}

/// Decodes a demo input file and validates its snapshot the same way
/// [`Codec::decode_snapshot`] does.
fn parse_input(bytes: &[u8]) -> Result<DemoInput, ProtocolError> {
    let input: DemoInput = JsonCodec.decode(bytes)?;
    input.snapshot.validate()?;
    Ok(input)
}

fn load(path: Option<String>) -> Result<DemoInput, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(seeded_hostel());
    };
    let bytes = std::fs::read(&path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let input = parse_input(&bytes)?;
    tracing::info!(%path, rooms = input.snapshot.rooms.len(), "snapshot loaded");
    Ok(input)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let input = load(std::env::args().nth(1))?;
    let service = SwapService::builder()
        .config(input.config)
        .snapshot(input.snapshot)
        .spawn()?;

    let before = service.state_report().await?;
    println!("\n--- INITIAL ROOM STATE AND PENDING REQUESTS (Total Rooms: {}) ---", before.len());
    println!("{before}");

    let report = service.run_pass_all().await?;
    for (n, cycle) in report.cycles.iter().enumerate() {
        println!("\nCycle {}: {cycle}", n + 1);
        for moved in &cycle.relocations {
            println!("   {moved}");
        }
    }
    println!("\nTotal cycles executed: {}", report.cycles.len());

    let after = service.state_report().await?;
    println!("\n--- FINAL ROOM STATE AND REMAINING REQUESTS (Total Rooms: {}) ---", after.len());
    println!("{after}");

    service.shutdown().await?;
    Ok(())
}
