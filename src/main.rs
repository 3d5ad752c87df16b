// =========================================================
// paillier_grades — notes pondérées sous chiffrement Paillier
//
//   keygen    : détenteur de clés, produit la paire (JSON)
//   encrypt   : détenteur de clés, chiffre les 4 notes
//   aggregate : agrégateur, calcule Π c_i^{w_i} mod n² sans rien voir
//   decrypt   : détenteur de clés, déchiffre l'agrégat
//   demo      : tout le parcours dans un seul processus
// =========================================================

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use rand_core::OsRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use paillier_grades::key_management::{
    ciphertext_to_json, encrypted_scores_to_json, json_to_ciphertext,
    json_to_encrypted_scores, json_to_private_key, json_to_public_key,
    keypair_to_json, parse_biguint, CiphertextJson, EncryptedScoresJson,
    PrivateKeyJson, PublicKeyJson,
};
use paillier_grades::p_keygen::generate_keys_with;
use paillier_grades::scores::score_out_of_ten;
use paillier_grades::{
    aggregate, decrypt, encrypt, CancelFlag, CryptoError, KeyGenConfig, KeyMode, KeySession, Scores,
};

// ─────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "paillier_grades")]
#[command(about = "Agrégation pondérée de notes chiffrées (Paillier)")]
#[command(version)]
struct Cli {
    /// Journalisation détaillée (étapes de génération de clés)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Génère une paire de clés et l'écrit en JSON sur la sortie standard
    Keygen(KeygenArgs),

    /// Chiffre exactement 4 notes (examen, TP, quiz, projet)
    Encrypt {
        /// Clé publique JSON, ou "-" pour l'entrée standard
        #[arg(long)]
        public_key: String,
        /// Notes décimales ou hexadécimales (0x…)
        #[arg(num_args = 1..)]
        scores: Vec<String>,
    },

    /// Agrège 4 chiffrés avec les poids [5, 3, 1, 1]
    Aggregate {
        #[arg(long)]
        public_key: String,
        /// Chiffrés JSON (sortie de `encrypt`), ou "-"
        #[arg(long)]
        ciphertexts: String,
    },

    /// Déchiffre un chiffré
    Decrypt {
        /// Clé privée JSON, ou "-"
        #[arg(long)]
        private_key: String,
        /// Chiffré JSON (sortie de `aggregate`), ou "-"
        #[arg(long)]
        ciphertext: String,
        /// Affiche la somme pondérée divisée par 10
        #[arg(long)]
        out_of_ten: bool,
    },

    /// Génère, chiffre, agrège et déchiffre dans le même processus
    Demo {
        #[command(flatten)]
        keygen: KeygenArgs,
        /// 4 notes ; tirées dans [0, 10] si absentes
        #[arg(num_args = 4)]
        scores: Option<Vec<String>>,
    },
}

#[derive(Args)]
struct KeygenArgs {
    /// Fichier de configuration JSON (max_prime, mode, max_attempts)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Borne supérieure sur p et q
    #[arg(long)]
    max_prime: Option<String>,
    /// simplified ou general
    #[arg(long)]
    mode: Option<KeyMode>,
    /// Nombre maximal de tirages (p, q[, g])
    #[arg(long)]
    max_attempts: Option<u32>,
}

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(io::Error),
    Json(serde_json::Error),
    Logging(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e)  => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)      => write!(f, "Erreur I/O : {}", e),
            AppError::Json(e)    => write!(f, "JSON invalide : {}", e),
            AppError::Logging(e) => write!(f, "Journalisation : {}", e),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<paillier_grades::ValidationError> for AppError {
    fn from(e: paillier_grades::ValidationError) -> Self { AppError::Crypto(e.into()) }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self { AppError::Io(e) }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self { AppError::Json(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("[ERREUR] {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Logging(e.to_string()))?;

    match cli.command {
        Command::Keygen(args) => {
            let keys = generate_keys_with(&keygen_config(&args)?, &mut OsRng, &CancelFlag::new())?;
            print_json(&keypair_to_json(&keys))
        }

        Command::Encrypt { public_key, scores } => {
            let pk = json_to_public_key(&read_json_arg::<PublicKeyJson>(&public_key)?)?;
            let scores = parse_scores(&scores)?;
            let encrypted = encrypt(&pk, &scores)?;
            print_json(&encrypted_scores_to_json(&encrypted))
        }

        Command::Aggregate { public_key, ciphertexts } => {
            let pk = json_to_public_key(&read_json_arg::<PublicKeyJson>(&public_key)?)?;
            let cts = json_to_encrypted_scores(&read_json_arg::<EncryptedScoresJson>(&ciphertexts)?)?;
            let agg = aggregate(&pk, &cts)?;
            print_json(&ciphertext_to_json(&agg))
        }

        Command::Decrypt { private_key, ciphertext, out_of_ten } => {
            let sk = json_to_private_key(&read_json_arg::<PrivateKeyJson>(&private_key)?)?;
            let ct = json_to_ciphertext(&read_json_arg::<CiphertextJson>(&ciphertext)?)?;
            let m = decrypt(&sk, &ct)?;
            if out_of_ten {
                println!("{}", score_out_of_ten(&m));
            } else {
                println!("{}", m);
            }
            Ok(())
        }

        Command::Demo { keygen, scores } => demo(&keygen, scores.as_deref()),
    }
}

// ─────────────────────────────────────────────────────────
// Démonstration complète : détenteur et agrégateur
// ─────────────────────────────────────────────────────────

fn demo(args: &KeygenArgs, scores: Option<&[String]>) -> Result<(), AppError> {
    let session = KeySession::generate(&keygen_config(args)?)?;
    let pk = session.public_key();
    info!(n = %pk.n(), g = %pk.g(), "clé publique transmise à l'agrégateur");

    let scores = match scores {
        Some(raw) => parse_scores(raw)?,
        None => {
            let mut rng = rand::thread_rng();
            Scores::from([(); 4].map(|_| rng.gen_range(0..=10u64)))
        }
    };
    info!(
        exam = %scores.exam, lab = %scores.lab, quiz = %scores.quiz, project = %scores.project,
        "notes en clair (détenteur)"
    );

    let encrypted = encrypt(&pk, &scores)?;
    for (i, ct) in encrypted.iter().enumerate() {
        info!(index = i, c = %ct.value(), "chiffré");
    }

    // Côté agrégateur : clé publique et chiffrés uniquement
    let agg = aggregate(&pk, &encrypted)?;
    info!(c = %agg.value(), "agrégat chiffré");

    let sum = session.decrypt(&agg)?;
    if sum != scores.weighted_sum() {
        info!("la somme pondérée dépasse n : résultat réduit modulo n");
    }
    println!("Somme pondérée : {}", sum);
    println!("Note finale    : {}", score_out_of_ten(&sum));
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Utilitaires
// ─────────────────────────────────────────────────────────

fn keygen_config(args: &KeygenArgs) -> Result<KeyGenConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => KeyGenConfig::load(path)?,
        None       => KeyGenConfig::default(),
    };
    if let Some(raw) = &args.max_prime {
        config.max_prime = parse_biguint(raw)?;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(attempts) = args.max_attempts {
        config.max_attempts = attempts;
    }
    Ok(config)
}

fn parse_scores(raw: &[String]) -> Result<Scores, AppError> {
    let values = raw
        .iter()
        .map(|s| parse_biguint(s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scores::from_slice(&values)?)
}

// "-" lit l'entrée standard, sinon l'argument est le JSON lui-même
fn read_json_arg<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    if raw == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(serde_json::from_str(&buf)?);
    }
    Ok(serde_json::from_str(raw)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
