use definitions::{Haplotype, ReadFormat, ReadMode};
use readsim_cli::emission::*;
use simulator::{RandomBiallelicGenomeEmitter, RandomBiallelicTranscriptomeEmitter};
use simulator::{RandomTranscriptomeEmitter, SequenceConfig};
use std::path::Path;
#[macro_use]
extern crate log;

fn main() -> std::io::Result<()> {
    let matches = readsim_cli::commands::readsim_parser().get_matches();
    if let Some(("pipeline", sub_m)) = matches.subcommand() {
        let path: &String = get_arg(sub_m, "profile")?;
        let file = std::fs::read_to_string(path)?;
        let config: readsim_cli::pipeline::PipelineConfig =
            toml::from_str(&file).map_err(|why| invalid(format!("{}:{}", path, why)))?;
        return readsim_cli::pipeline::run_pipeline(&config);
    }
    if let Some((_, sub_m)) = matches.subcommand() {
        let level = match sub_m.get_count("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }
    match matches.subcommand() {
        Some(("transcriptome", sub_m)) => transcriptome(sub_m),
        Some(("biallelic", sub_m)) => biallelic(sub_m),
        Some(("genome", sub_m)) => genome(sub_m),
        Some(("random", sub_m)) => random(sub_m),
        _ => Ok(()),
    }
}

fn invalid(why: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, why)
}

fn get_arg<'a>(matches: &'a clap::ArgMatches, id: &str) -> std::io::Result<&'a String> {
    matches
        .get_one::<String>(id)
        .ok_or_else(|| invalid(format!("--{} is required", id)))
}

fn parse_arg<T>(matches: &clap::ArgMatches, id: &str) -> std::io::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = get_arg(matches, id)?;
    value
        .parse()
        .map_err(|why| invalid(format!("--{} {}:{}", id, value, why)))
}

fn set_threads(matches: &clap::ArgMatches) -> std::io::Result<()> {
    let threads: usize = parse_arg(matches, "threads")?;
    debug!("Set Threads\t{}", threads);
    if let Err(why) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        debug!("{:?}", why);
    }
    Ok(())
}

fn read_mode(matches: &clap::ArgMatches) -> std::io::Result<ReadMode> {
    match get_arg(matches, "mode")?.as_str() {
        "full" => Ok(ReadMode::Full),
        "long" => Ok(ReadMode::Long),
        "short" => parse_arg(matches, "read_length").map(ReadMode::Short),
        other => Err(invalid(format!("unknown mode {}", other))),
    }
}

struct ReadOptions<'a> {
    num: usize,
    mode: ReadMode,
    seed: u64,
    uniform: bool,
    format: ReadFormat,
    output: Option<&'a Path>,
}

impl<'a> ReadOptions<'a> {
    fn new(matches: &'a clap::ArgMatches) -> std::io::Result<Self> {
        let num = parse_si(get_arg(matches, "num")?).map_err(invalid)?;
        let format = parse_arg(matches, "format")?;
        Ok(Self {
            num,
            mode: read_mode(matches)?,
            seed: parse_arg(matches, "seed")?,
            uniform: matches.get_flag("uniform"),
            format,
            output: matches.get_one::<String>("output").map(Path::new),
        })
    }
}

fn transcriptome(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tTranscriptome");
    set_threads(matches)?;
    let opts = ReadOptions::new(matches)?;
    let transcripts = Path::new(get_arg(matches, "transcripts")?);
    let expression = matches.get_one::<String>("expression").map(Path::new);
    let transcriptome = load_transcriptome(transcripts, expression)?;
    let mut emitter = RandomTranscriptomeEmitter::new(transcriptome, batch_rng(opts.seed, 0));
    emitter.set_force_uniform_random(opts.uniform);
    let reseed = |em: &RandomTranscriptomeEmitter<SimRng>, rng: SimRng| em.with_rng(rng);
    let reads = emit_reads(&emitter, reseed, opts.num, opts.mode, opts.seed)?;
    write_reads_to(opts.output, &reads, opts.format)
}

fn biallelic(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tBiallelic");
    set_threads(matches)?;
    let opts = ReadOptions::new(matches)?;
    let hap1 = Path::new(get_arg(matches, "hap1")?);
    let hap2 = Path::new(get_arg(matches, "hap2")?);
    let expression = matches.get_one::<String>("expression").map(Path::new);
    let reference = match get_arg(matches, "reference_haplotype")?.as_str() {
        "2" => Haplotype::Second,
        _ => Haplotype::First,
    };
    let (hap1, hap2) = match reference {
        Haplotype::First => (
            load_transcriptome(hap1, expression)?,
            load_transcriptome(hap2, None)?,
        ),
        Haplotype::Second => (
            load_transcriptome(hap1, None)?,
            load_transcriptome(hap2, expression)?,
        ),
    };
    let rng = batch_rng(opts.seed, 0);
    let mut emitter =
        RandomBiallelicTranscriptomeEmitter::with_expression_reference(hap1, hap2, reference, rng);
    emitter.set_force_uniform_random(opts.uniform);
    if let Some(rho) = matches.get_one::<String>("rho") {
        debug!("Opening {}", rho);
        let table = simulator::loader::load_table_from_file(rho)?;
        simulator::loader::apply_rho(&mut emitter, &table)?;
    }
    let reseed = |em: &RandomBiallelicTranscriptomeEmitter<SimRng>, rng: SimRng| em.with_rng(rng);
    let reads = emit_reads(&emitter, reseed, opts.num, opts.mode, opts.seed)?;
    write_reads_to(opts.output, &reads, opts.format)
}

fn genome(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tGenome");
    set_threads(matches)?;
    let seed: u64 = parse_arg(matches, "seed")?;
    let reference = get_arg(matches, "reference")?;
    let variants = get_arg(matches, "variants")?;
    debug!("Opening {} {}", reference, variants);
    let rng = batch_rng(seed, 0);
    let mut emitter = RandomBiallelicGenomeEmitter::from_files(reference, variants, rng)?;
    let diploid = emitter.emit_genomes()?;
    write_diploid(get_arg(matches, "prefix")?, &diploid)
}

fn random(matches: &clap::ArgMatches) -> std::io::Result<()> {
    debug!("START\tRandom");
    set_threads(matches)?;
    let num = parse_si(get_arg(matches, "num")?).map_err(invalid)?;
    let seed: u64 = parse_arg(matches, "seed")?;
    let config = SequenceConfig::new(
        parse_arg(matches, "min")?,
        parse_arg(matches, "max")?,
        parse_arg(matches, "gc")?,
    )?;
    let format: ReadFormat = parse_arg(matches, "format")?;
    let output = matches.get_one::<String>("output").map(Path::new);
    let reads = emit_random(&config, num, seed)?;
    write_reads_to(output, &reads, format)
}
