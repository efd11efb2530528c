//! Heterozygous variant sites in a VCF-like, tab-delimited file.
//! Only the columns CHROM(0), POS(1), REF(3), and ALT(4) are used. Lines starting with `#` are skipped.
use crate::error::{Result, SimulationError};
use definitions::Variant;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

/// chromosome -> position -> variant. Both levels are sorted.
pub type VariantSet = BTreeMap<String, BTreeMap<u64, Variant>>;

fn parse_line(line: &str, lineno: usize) -> Result<Variant> {
    let malformed = |reason: String| SimulationError::MalformedVariant {
        line: lineno,
        reason,
    };
    let fields: Vec<_> = line.split('\t').collect();
    if fields.len() < 5 {
        return Err(malformed(format!("{} columns", fields.len())));
    }
    let pos: u64 = fields[1]
        .parse()
        .map_err(|_| malformed(format!("{} is not a position", fields[1])))?;
    if pos == 0 {
        return Err(malformed("position should be 1-based".to_string()));
    }
    Ok(Variant::new(fields[0], pos, fields[3], fields[4]))
}

pub fn parse_variants<R: BufRead>(reader: R) -> Result<VariantSet> {
    let mut variants = VariantSet::new();
    let mut count = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let variant = parse_line(line, i + 1)?;
        let sites = variants.entry(variant.chrom.clone()).or_default();
        if let Some(old) = sites.insert(variant.pos, variant) {
            warn!("DUPLICATE\t{}\t{}\tOverwritten", old.chrom, old.pos);
        }
        count += 1;
    }
    debug!("VARIANTS\t{}\t{}", count, variants.len());
    Ok(variants)
}

pub fn parse_variants_from_file<P: AsRef<Path>>(path: P) -> Result<VariantSet> {
    let reader = std::fs::File::open(path).map(std::io::BufReader::new)?;
    parse_variants(reader)
}
