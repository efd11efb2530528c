//! Readers for the inputs of the emitters: FASTA files and two column tables.
use crate::biallelic_transcriptome::RandomBiallelicTranscriptomeEmitter;
use crate::error::{Result, SimulationError};
use definitions::Transcript;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;

/// chromosome -> uppercased sequence.
pub type Genome = BTreeMap<String, Vec<u8>>;

pub fn load_genome<R: std::io::Read>(reader: R) -> Result<Genome> {
    let records = bio_utils::fasta::parse_into_vec_from(reader)?;
    let genome: Genome = records
        .iter()
        .map(|record| (record.id().to_string(), record.seq().to_ascii_uppercase()))
        .collect();
    let total: usize = genome.values().map(|seq| seq.len()).sum();
    debug!("GENOME\t{}\t{}", genome.len(), total);
    Ok(genome)
}

pub fn load_genome_from_file<P: AsRef<Path>>(path: P) -> Result<Genome> {
    let reader = std::fs::File::open(path).map(std::io::BufReader::new)?;
    load_genome(reader)
}

/// Read transcripts from a FASTA file. The ID is the unique name and the description, if any, is the display name.
pub fn load_transcripts<R: std::io::Read>(reader: R) -> Result<Vec<Transcript>> {
    let records = bio_utils::fasta::parse_into_vec_from(reader)?;
    let transcripts: Vec<_> = records
        .iter()
        .map(|record| {
            let name = match record.desc() {
                Some(desc) if !desc.trim().is_empty() => desc.trim().to_string(),
                _ => record.id().to_string(),
            };
            let seq = String::from_utf8_lossy(record.seq());
            Transcript::new(record.id(), &name, &seq)
        })
        .collect();
    debug!("TRANSCRIPTS\t{}", transcripts.len());
    Ok(transcripts)
}

pub fn load_transcripts_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Transcript>> {
    let reader = std::fs::File::open(path).map(std::io::BufReader::new)?;
    load_transcripts(reader)
}

/// Parse `name<TAB>value` lines. `#` lines and empty lines are skipped.
pub fn load_table<R: BufRead>(reader: R) -> Result<HashMap<String, f64>> {
    let mut table = HashMap::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let value = match (fields.next(), fields.next()) {
            (Some(name), Some(value)) => value.trim().parse::<f64>().ok().map(|v| (name, v)),
            _ => None,
        };
        match value {
            Some((name, value)) => table.insert(name.to_string(), value),
            None => {
                let reason = format!("line {} of the table: {}", i + 1, line);
                return Err(SimulationError::InvalidConfig(reason));
            }
        };
    }
    Ok(table)
}

pub fn load_table_from_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, f64>> {
    let reader = std::fs::File::open(path).map(std::io::BufReader::new)?;
    load_table(reader)
}

/// Attach expression weights. Transcripts absent from the table get zero.
pub fn attach_expression(transcripts: &mut [Transcript], weights: &HashMap<String, f64>) {
    let mut found = 0;
    for t in transcripts.iter_mut() {
        let weight = weights.get(&t.unique_name).copied();
        found += weight.is_some() as usize;
        t.expression = Some(weight.unwrap_or(0f64));
    }
    if found < weights.len() {
        warn!("EXPRESSION\t{}\tUnknownNames", weights.len() - found);
    }
    debug!("EXPRESSION\t{}\t{}", found, transcripts.len());
}

/// Set rho of each transcript listed in the table.
pub fn apply_rho<R: Rng>(
    emitter: &mut RandomBiallelicTranscriptomeEmitter<R>,
    rho: &HashMap<String, f64>,
) -> Result<()> {
    for (name, &value) in rho.iter() {
        emitter.set_rho(name, value)?;
    }
    debug!("RHO\t{}", rho.len());
    Ok(())
}
