use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod client;
mod config;
mod enrichment;
mod generation;
mod models;
mod radio;


use crate::client::SpotifyClient;
use crate::config::load_config;
use crate::enrichment::{ArtistEnricher, EnrichmentCapability};
use crate::generation::OpenAiClient;
use crate::radio::{
    Picker, RadioConfig, RngPicker, ShowOpening, ShowProducer, ShowSegment, ShowState,
};

#[derive(Parser)]
#[command(name = "opm-radio")]
#[command(about = "AI Tagalog radio: an AI DJ picks OPM tracks to match its mood")]
#[command(version)]
struct Args {
    /// Path to an optional radio tuning JSON file
    #[arg(short = 'c', long = "config", global = true)]
    config_file: Option<String>,

    /// Override the market all searches are scoped to (e.g. PH)
    #[arg(short = 'm', long = "market", global = true)]
    market: Option<String>,

    /// Seed for reproducible strategy picks
    #[arg(long = "seed", global = true)]
    seed: Option<u64>,

    /// Directory where narration audio and album art are written
    #[arg(short = 'o', long = "out-dir", default_value = "show", global = true)]
    out_dir: PathBuf,

    /// Debug mode - print what would be saved instead of creating a playlist
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a single-track radio show
    Show {
        /// Save the selected track to a new playlist
        #[arg(long = "playlist")]
        playlist: bool,

        /// Add the selected track to your saved library
        #[arg(long = "save")]
        save: bool,
    },
    /// Start continuous play with a mood-driven track list
    Radio {
        /// Number of tracks to queue (defaults to the config value)
        #[arg(short = 'n', long = "count")]
        count: Option<usize>,

        /// Save the queued tracks to a new playlist with a generated cover
        #[arg(long = "playlist")]
        playlist: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut radio_config = match &args.config_file {
        Some(path) => match RadioConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load radio configuration '{path}': {e}");
                return Err(anyhow::anyhow!("Failed to load radio configuration: {}", e));
            }
        },
        None => RadioConfig::default(),
    };
    if let Some(market) = &args.market {
        radio_config.market = market.to_uppercase();
    }

    // Load configuration from .env
    let config = load_config()?;

    let spotify = SpotifyClient::new(&config);
    let openai = OpenAiClient::new(&config);
    let enricher = ArtistEnricher::new(EnrichmentCapability::from_config(&config));
    let notes_source = if enricher.is_available() {
        "live web search"
    } else {
        "built-in notes"
    };
    let producer = ShowProducer::new(&spotify, &openai, &enricher, &radio_config);

    let mut picker: Box<dyn Picker> = match args.seed {
        Some(seed) => Box::new(RngPicker::seeded(seed)),
        None => Box::new(RngPicker::from_entropy()),
    };

    std::fs::create_dir_all(&args.out_dir)?;

    println!("📻 AI Tagalog Radio");
    println!("Market: {} | Artist notes: {notes_source}", radio_config.market);

    let (state, save_playlist) = match args.command {
        Command::Show { playlist, save } => {
            println!("\n🤖 AI DJ is preparing the show...");
            let (state, opening) = producer.start_show(&ShowState::new(), picker.as_mut())?;
            print_opening(&opening, &args.out_dir, 1)?;
            if save {
                save_track(&producer, &spotify, &state, args.debug);
            }
            (state, playlist)
        }
        Command::Radio { count, playlist } => {
            let count = count.unwrap_or(radio_config.default_track_count);
            println!("\n🤖 AI DJ is queueing {count} tracks...");
            let (mut state, opening) =
                producer.start_radio(&ShowState::new(), count, picker.as_mut())?;
            println!("Queued {} tracks", state.tracks.len());
            print_opening(&opening, &args.out_dir, 1)?;

            while let Some((next, segment)) = producer.next_segment(&state) {
                print_segment(&segment, &args.out_dir, next.current_index + 1)?;
                println!("   ({} more queued)", next.remaining());
                state = next;
            }
            (state.stopped(), playlist)
        }
    };

    if !save_playlist {
        return Ok(());
    }

    if args.debug {
        println!("\n🔍 DEBUG MODE: would save {} tracks to a playlist", state.tracks.len());
        for (i, track) in state.tracks.iter().enumerate() {
            println!(
                "     {}. \"{}\" by {} [pop {}] | ID: {}",
                i + 1,
                track.name,
                track.artist_names().join(", "),
                track.popularity,
                track.id
            );
        }
        return Ok(());
    }

    println!("\n🎵 Saving playlist...");
    match producer.publish_playlist(&spotify, &state) {
        Ok(saved) => {
            if let Some(id) = &saved.playlist_id {
                println!("✓ Saved playlist: https://open.spotify.com/playlist/{id}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Failed to save playlist: {e:#}");
            Err(e)
        }
    }
}

fn save_track(
    producer: &ShowProducer<'_>,
    library: &SpotifyClient,
    state: &ShowState,
    debug: bool,
) {
    if debug {
        if let Some(track) = state.current_track() {
            println!("\n🔍 DEBUG MODE: would save \"{}\" | ID: {}", track.name, track.id);
        }
        return;
    }
    match producer.save_current_track(library, state) {
        Ok(track) => println!("💚 Saved \"{}\" to your library!", track.name),
        Err(e) => eprintln!("✗ Failed to save track: {e:#}"),
    }
}

fn print_opening(opening: &ShowOpening, out_dir: &Path, position: usize) -> Result<()> {
    println!("\n## 📻 Your AI Radio Show");
    println!("\n### 🎙️ DJ Script");
    println!("Mood: {} ({})", opening.script.mood, opening.mood.category);
    println!("{}", opening.script.raw);
    print_segment(&opening.segment, out_dir, position)
}

fn print_segment(segment: &ShowSegment, out_dir: &Path, position: usize) -> Result<()> {
    let track = &segment.track;
    println!("\n### 🎵 Track {position}");
    println!("**{}** by **{}**", track.name, track.artist_names().join(", "));
    println!("   Popularity: {} | Album: {}", track.popularity, track.album.name);
    println!("   {}", segment.artist_note);
    println!("   🔗 {}", track.share_url());
    println!("   🎙️ {}", segment.narration);

    if let Some(voice) = &segment.voice {
        let path = out_dir.join(format!("{position:02}-dj.mp3"));
        std::fs::write(&path, voice)?;
        println!("   🔊 DJ voice: {}", path.display());
    }
    if let Some(art) = &segment.album_art {
        let path = out_dir.join(format!("{position:02}-art.png"));
        std::fs::write(&path, art)?;
        println!("   🖼️ Album art: {}", path.display());
    }
    Ok(())
}
