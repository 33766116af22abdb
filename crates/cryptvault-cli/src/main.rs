//! cryptvault: password-based file and text encryption CLI
//!
//! Commands:
//!   encrypt / decrypt <file>           - AES-256-CBC envelope on disk
//!   encrypt-text / decrypt-text        - same envelope, hex on stdout
//!   batch-encrypt / batch-decrypt      - many files in parallel
//!   view / stats / hash <file>         - inspect a file
//!   about                              - describe the scheme
//!   config show                        - display current configuration

mod batch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cryptvault_core::config::{default_config_path, expand_tilde, LogFormat, VaultConfig};
use cryptvault_core::password::{rate, Strength};
use cryptvault_core::paths;
use cryptvault_core::preview::preview_file;
use cryptvault_core::stats::FileStats;
use cryptvault_crypto::{
    decrypt_file, decrypt_text, encrypt_file, encrypt_text, hash_file, OsRandom,
};

use batch::{BatchEntry, Direction, Outcome};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "cryptvault",
    version,
    about = "Password-based file and text encryption",
    long_about = "cryptvault: encrypt files and text with AES-256-CBC under a SHA-256-derived key"
)]
struct Cli {
    /// Path to config.toml (default: ~/.config/cryptvault/config.toml)
    #[arg(long, short = 'c', env = "CRYPTVAULT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level filter (overrides config; RUST_LOG overrides both)
    #[arg(long, env = "CRYPTVAULT_LOG", global = true)]
    log: Option<String>,

    /// Log output format (overrides config)
    #[arg(long, value_enum, env = "CRYPTVAULT_LOG_FORMAT", global = true)]
    log_format: Option<LogFormatArg>,

    /// Read the password from this environment variable instead of prompting
    #[arg(long, value_name = "VAR", global = true)]
    password_env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file (default output: <input>.enc)
    Encrypt {
        input: PathBuf,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Decrypt a file (default output: input without .enc, or decrypted_<name>)
    Decrypt {
        input: PathBuf,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Encrypt a string and print the envelope as hex
    #[command(name = "encrypt-text")]
    EncryptText { text: String },

    /// Decrypt a hex envelope and print the text
    #[command(name = "decrypt-text")]
    DecryptText { hex: String },

    /// Encrypt many files in parallel with one password
    #[command(name = "batch-encrypt")]
    BatchEncrypt {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Decrypt many files in parallel with one password
    #[command(name = "batch-decrypt")]
    BatchDecrypt {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the first lines of a file
    View { file: PathBuf },

    /// Show size and character counts for a file
    Stats { file: PathBuf },

    /// Print the SHA-256 digest of a file
    Hash { file: PathBuf },

    /// Describe the encryption scheme
    About,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(expand_tilde)
        .unwrap_or_else(default_config_path);

    // Config is read before logging exists; a bad file is reported by anyhow.
    let config = load_config(&config_path)?;

    let level = cli.log.as_deref().unwrap_or(config.log.level.as_str());
    let format = cli.log_format.map(LogFormat::from).unwrap_or(config.log.format);
    init_logging(level, format);

    tracing::debug!(config = %config_path.display(), "cryptvault starting");

    let pw_env = cli.password_env.as_deref();

    match cli.command {
        Commands::Encrypt { input, output } => cmd_encrypt(&config, &input, output, pw_env),
        Commands::Decrypt { input, output } => cmd_decrypt(&config, &input, output, pw_env),
        Commands::EncryptText { text } => cmd_encrypt_text(&text, pw_env),
        Commands::DecryptText { hex } => cmd_decrypt_text(&hex, pw_env),
        Commands::BatchEncrypt { files } => cmd_batch(&config, &files, Direction::Encrypt, pw_env),
        Commands::BatchDecrypt { files } => cmd_batch(&config, &files, Direction::Decrypt, pw_env),
        Commands::View { file } => cmd_view(&config, &file),
        Commands::Stats { file } => cmd_stats(&file),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::About => {
            cmd_about();
            Ok(())
        }
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &config_path),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> Result<VaultConfig> {
    VaultConfig::load(path).with_context(|| format!("loading config: {}", path.display()))
}

// ── Password input ────────────────────────────────────────────────────────────

/// Read the password from `env_var` if given, otherwise prompt without echo.
///
/// With `show_strength` set, the strength rating is printed to stderr.
fn read_password(env_var: Option<&str>, show_strength: bool) -> Result<SecretString> {
    let password = match env_var {
        Some(var) => SecretString::from(
            std::env::var(var).with_context(|| format!("reading password from ${var}"))?,
        ),
        None => SecretString::from(
            rpassword::prompt_password("Password: ").context("reading password")?,
        ),
    };

    if password.expose_secret().is_empty() {
        anyhow::bail!("password must not be empty");
    }

    if show_strength {
        let strength = rate(password.expose_secret());
        eprintln!("Password strength: {strength}");
        if strength == Strength::Weak {
            eprintln!("  (consider a longer password mixing cases, digits and symbols)");
        }
    }

    Ok(password)
}

// ── Progress bar helpers ──────────────────────────────────────────────────────

fn make_progress_bar(total: u64, prefix: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("progress bar template")?
            .progress_chars("=>-"),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

// ── `cryptvault encrypt` ──────────────────────────────────────────────────────

fn cmd_encrypt(
    config: &VaultConfig,
    input: &Path,
    output: Option<PathBuf>,
    pw_env: Option<&str>,
) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("file not found: {}", input.display());
    }
    let output = output.unwrap_or_else(|| paths::add_extension(input, &config.files.extension));
    let password = read_password(pw_env, true)?;

    let start = Instant::now();
    let report = encrypt_file(input, &output, &password, &OsRandom)?;
    let elapsed = start.elapsed();

    println!("Encrypted: {} → {}", input.display(), output.display());
    println!(
        "  {} → {} in {}",
        fmt_bytes(report.input_bytes),
        fmt_bytes(report.output_bytes),
        fmt_duration(elapsed)
    );
    print_stats(&FileStats::from_path(&output)?);
    Ok(())
}

// ── `cryptvault decrypt` ──────────────────────────────────────────────────────

fn cmd_decrypt(
    config: &VaultConfig,
    input: &Path,
    output: Option<PathBuf>,
    pw_env: Option<&str>,
) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("file not found: {}", input.display());
    }
    let files = &config.files;
    let output = output.unwrap_or_else(|| {
        paths::decrypted_output(input, &files.extension, &files.decrypted_prefix)
    });
    let password = read_password(pw_env, false)?;

    let start = Instant::now();
    let report = decrypt_file(input, &output, &password)?;
    let elapsed = start.elapsed();

    println!("Decrypted: {} → {}", input.display(), output.display());
    println!(
        "  {} → {} in {}",
        fmt_bytes(report.input_bytes),
        fmt_bytes(report.output_bytes),
        fmt_duration(elapsed)
    );
    print_stats(&FileStats::from_path(&output)?);
    Ok(())
}

// ── `cryptvault encrypt-text` / `decrypt-text` ────────────────────────────────

fn cmd_encrypt_text(text: &str, pw_env: Option<&str>) -> Result<()> {
    let password = read_password(pw_env, true)?;
    let hex = encrypt_text(text, &password, &OsRandom).context("encrypting text")?;
    println!("{hex}");
    Ok(())
}

fn cmd_decrypt_text(hex: &str, pw_env: Option<&str>) -> Result<()> {
    let password = read_password(pw_env, false)?;
    let text = decrypt_text(hex, &password).context("decrypting text")?;
    println!("{text}");
    Ok(())
}

// ── `cryptvault batch-encrypt` / `batch-decrypt` ──────────────────────────────

fn cmd_batch(
    config: &VaultConfig,
    files: &[PathBuf],
    direction: Direction,
    pw_env: Option<&str>,
) -> Result<()> {
    let password = read_password(pw_env, direction == Direction::Encrypt)?;

    let prefix = match direction {
        Direction::Encrypt => "encrypt",
        Direction::Decrypt => "decrypt",
    };
    let pb = make_progress_bar(files.len() as u64, prefix)?;

    let start = Instant::now();
    let entries = batch::run(
        files,
        direction,
        &password,
        &config.files,
        config.batch.workers,
        Some(&pb),
    )?;
    pb.finish_and_clear();

    for entry in &entries {
        print_batch_entry(entry);
    }

    let ok = entries.iter().filter(|e| e.succeeded()).count();
    println!(
        "\n{ok}/{} files {} in {}",
        entries.len(),
        direction.past_tense(),
        fmt_duration(start.elapsed())
    );

    if ok < entries.len() {
        anyhow::bail!("{} of {} files failed", entries.len() - ok, entries.len());
    }
    Ok(())
}

fn print_batch_entry(entry: &BatchEntry) {
    match &entry.outcome {
        Outcome::Done { output, elapsed } => println!(
            "  ok        {} → {} ({})",
            entry.input.display(),
            output.display(),
            fmt_duration(*elapsed)
        ),
        Outcome::NotFound => println!("  not found {}", entry.input.display()),
        Outcome::Failed(msg) => println!("  failed    {}: {msg}", entry.input.display()),
    }
}

// ── `cryptvault view` / `stats` / `hash` ──────────────────────────────────────

fn cmd_view(config: &VaultConfig, file: &Path) -> Result<()> {
    let max = config.files.preview_lines;
    let preview = preview_file(file, max)?;
    for line in &preview.lines {
        println!("{line}");
    }
    if preview.truncated {
        println!("... (showing first {max} lines)");
    }
    Ok(())
}

fn cmd_stats(file: &Path) -> Result<()> {
    println!("{}", file.display());
    print_stats(&FileStats::from_path(file)?);
    Ok(())
}

fn cmd_hash(file: &Path) -> Result<()> {
    let digest = hash_file(file)?;
    println!("{digest}  {}", file.display());
    Ok(())
}

// ── `cryptvault about` ────────────────────────────────────────────────────────

fn cmd_about() {
    println!("cryptvault {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  cipher:   AES-256 in CBC mode, PKCS#7 padding");
    println!("  key:      SHA-256(password), 32 bytes");
    println!("  IV:       16 random bytes from the OS, stored in front of the ciphertext");
    println!("  layout:   IV || C1 || ... || Cn  (text mode: lowercase hex of the same)");
    println!();
    println!("  No integrity tag: a wrong password and a corrupted file fail the same way.");
    println!("  The key is a single unsalted hash; use a long password.");
}

// ── `cryptvault config show` ──────────────────────────────────────────────────

fn cmd_config_show(config: &VaultConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

// ── Utilities ─────────────────────────────────────────────────────────────────

fn print_stats(stats: &FileStats) {
    println!("  size:    {}", fmt_bytes(stats.size));
    println!("  chars:   {}", stats.chars);
    println!("  letters: {}", stats.letters);
    println!("  digits:  {}", stats.digits);
    println!("  lines:   {}", stats.lines);
}

fn fmt_duration(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1000.0 {
        format!("{ms:.1} ms")
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

fn fmt_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
