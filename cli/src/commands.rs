use clap::{Arg, ArgAction, Command};

fn common_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("verbose")
            .short('v')
            .action(ArgAction::Count)
            .help("Debug mode"),
    )
    .arg(
        Arg::new("threads")
            .short('t')
            .long("threads")
            .default_value("1")
            .help("number of threads"),
    )
    .arg(
        Arg::new("seed")
            .long("seed")
            .help("Seed value for random number generators")
            .default_value("42"),
    )
}

fn read_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("expression")
            .long("expression")
            .short('e')
            .value_name("TSV")
            .help("Expression weights, `unique_name<TAB>weight` per line."),
    )
    .arg(
        Arg::new("uniform")
            .long("uniform")
            .action(ArgAction::SetTrue)
            .help("Draw transcripts uniformly even if expression weights are given."),
    )
    .arg(
        Arg::new("num")
            .short('n')
            .long("num")
            .default_value("1000")
            .help("Number of reads. SI suffixes are allowed(e.g., 10k)."),
    )
    .arg(
        Arg::new("mode")
            .long("mode")
            .default_value("long")
            .value_parser(["full", "long", "short"])
            .help("full: transcripts as is, long: full length in random strands, short: fragments."),
    )
    .arg(
        Arg::new("read_length")
            .short('l')
            .long("read_length")
            .default_value("100")
            .help("Length of short reads."),
    )
    .arg(format_arg())
    .arg(output_arg())
}

fn format_arg() -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .default_value("fasta")
        .value_parser(["fasta", "fastq", "json"])
        .help("Output format.")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("PATH")
        .help("Output file. STDOUT if not given.")
}

fn subcommand_transcriptome() -> Command {
    let cmd = Command::new("transcriptome")
        .version("0.1")
        .about("Emit reads from a transcriptome.")
        .arg(
            Arg::new("transcripts")
                .long("transcripts")
                .short('r')
                .value_name("FASTA")
                .required(true)
                .help("Transcript sequences. The ID is the unique name."),
        );
    read_args(common_args(cmd))
}

fn subcommand_biallelic() -> Command {
    let cmd = Command::new("biallelic")
        .version("0.1")
        .about("Emit reads from two haplotypes of a transcriptome with allele specific expression.")
        .arg(
            Arg::new("hap1")
                .long("hap1")
                .value_name("FASTA")
                .required(true)
                .help("Transcripts of haplotype 1."),
        )
        .arg(
            Arg::new("hap2")
                .long("hap2")
                .value_name("FASTA")
                .required(true)
                .help("Transcripts of haplotype 2. Should share the unique names with haplotype 1."),
        )
        .arg(
            Arg::new("rho")
                .long("rho")
                .value_name("TSV")
                .help("Probability of haplotype 1, `unique_name<TAB>rho` per line. 0.5 if not listed."),
        )
        .arg(
            Arg::new("reference_haplotype")
                .long("reference_haplotype")
                .default_value("1")
                .value_parser(["1", "2"])
                .help("The haplotype whose expression weights choose transcripts."),
        );
    read_args(common_args(cmd))
}

fn subcommand_genome() -> Command {
    let cmd = Command::new("genome")
        .version("0.1")
        .about("Emit a diploid genome by phasing heterozygous variants at random.")
        .arg(
            Arg::new("reference")
                .long("reference")
                .short('r')
                .value_name("FASTA")
                .required(true)
                .help("Reference genome."),
        )
        .arg(
            Arg::new("variants")
                .long("variants")
                .value_name("VCF")
                .required(true)
                .help("Heterozygous variants. CHROM, POS, REF, and ALT are used."),
        )
        .arg(
            Arg::new("prefix")
                .short('o')
                .long("prefix")
                .value_name("PREFIX")
                .required(true)
                .help("Write PREFIX.hap1.fa, PREFIX.hap2.fa, and PREFIX.phase.tsv"),
        );
    common_args(cmd)
}

fn subcommand_random() -> Command {
    let cmd = Command::new("random")
        .version("0.1")
        .about("Emit random sequences.")
        .arg(
            Arg::new("num")
                .short('n')
                .long("num")
                .default_value("1")
                .help("Number of sequences. SI suffixes are allowed(e.g., 10k)."),
        )
        .arg(
            Arg::new("min")
                .long("min")
                .default_value("200")
                .help("Minimum length."),
        )
        .arg(
            Arg::new("max")
                .long("max")
                .default_value("200")
                .help("Maximum length."),
        )
        .arg(
            Arg::new("gc")
                .long("gc")
                .default_value("0.5")
                .help("GC content."),
        )
        .arg(format_arg())
        .arg(output_arg());
    common_args(cmd)
}

fn subcommand_pipeline() -> Command {
    Command::new("pipeline")
        .version("0.1")
        .about("Run a simulation described in a TOML profile.")
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .required(true)
                .value_name("TOML")
                .help("TOML configuration file."),
        )
}

pub fn readsim_parser() -> Command {
    Command::new("readsim")
        .version("0.1")
        .about("Simulate sequencing data from transcriptomes and diploid genomes.")
        .arg_required_else_help(true)
        .subcommand(subcommand_transcriptome())
        .subcommand(subcommand_biallelic())
        .subcommand(subcommand_genome())
        .subcommand(subcommand_random())
        .subcommand(subcommand_pipeline())
}
