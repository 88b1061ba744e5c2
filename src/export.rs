//! CSV export of designed probes.
//!
//! One row per probe, columns:
//! `gene_name,name0,name1,strand_dir,genome_idx,index,gap_size,sequence,barcode,right_arm,scaffold,left_arm,right_tm,left_tm`.
//! Arm Tms are recomputed here with the caller's calculator; an unknown
//! genomic index is written as `-1`.
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::config::ThermoParams;
use crate::error::{Error, Result};
use crate::probe::ProbeHit;
use crate::thermo::ThermoCalculator;

#[derive(Serialize)]
struct Row<'a> {
    gene_name: &'a str,
    name0: &'a str,
    name1: &'a str,
    strand_dir: &'static str,
    genome_idx: i64,
    index: usize,
    gap_size: usize,
    sequence: &'a str,
    barcode: &'a str,
    right_arm: &'a str,
    scaffold: &'a str,
    left_arm: &'a str,
    right_tm: String,
    left_tm: String,
}

/// Write `results` (gene name, probes) as CSV to `writer`. Returns the number of rows.
pub fn write_padlocks_csv<W: Write, T: ThermoCalculator>(
    writer: W,
    results: &[(String, Vec<ProbeHit>)],
    params: &ThermoParams,
    calc: &T,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut n = 0usize;
    for (gene, hits) in results {
        for h in hits {
            wtr.serialize(Row {
                gene_name: gene,
                name0: &h.name0,
                name1: &h.name1,
                strand_dir: h.strand.as_str(),
                genome_idx: h.genome_idx.unwrap_or(-1),
                index: h.index,
                gap_size: h.gap_size,
                sequence: &h.sequence,
                barcode: &h.barcode,
                right_arm: &h.right_arm,
                scaffold: &h.scaffold,
                left_arm: &h.left_arm,
                right_tm: format!("{:.3}", calc.tm(&h.right_arm, params)),
                left_tm: format!("{:.3}", calc.tm(&h.left_arm, params)),
            })?;
            n += 1;
        }
    }
    if n == 0 {
        // serialize() emits the header with the first record; keep it for empty output.
        wtr.write_record(HEADER)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(n)
}

/// Column names, in output order.
pub const HEADER: [&str; 14] = [
    "gene_name", "name0", "name1", "strand_dir", "genome_idx", "index", "gap_size",
    "sequence", "barcode", "right_arm", "scaffold", "left_arm", "right_tm", "left_tm",
];

/// [`write_padlocks_csv`] to a file at `path`.
pub fn write_padlocks_csv_path<P: AsRef<Path>, T: ThermoCalculator>(
    path: P,
    results: &[(String, Vec<ProbeHit>)],
    params: &ThermoParams,
    calc: &T,
) -> Result<usize> {
    let p = path.as_ref();
    let f = std::fs::File::create(p).map_err(|e| Error::file_io(p, e))?;
    let n = write_padlocks_csv(std::io::BufWriter::new(f), results, params, calc)?;
    log::info!("wrote {} padlocks to {}", n, p.display());
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Strand;

    struct Flat;
    impl ThermoCalculator for Flat {
        fn tm(&self, seq: &str, _: &ThermoParams) -> f64 { seq.len() as f64 + 0.12345 }
        fn heterodimer_tm(&self, _: &str, _: &str, _: &ThermoParams) -> f64 { 0.0 }
    }

    fn hit(genome_idx: Option<i64>) -> ProbeHit {
        ProbeHit {
            name0: "ENST1".into(),
            name1: "ENSE1".into(),
            strand: Strand::Reverse,
            genome_idx,
            index: 7,
            gap_size: 0,
            sequence: "CCCTTTAA".into(),
            barcode: "ACGT".into(),
            right_arm: "CCC".into(),
            scaffold: "TTT".into(),
            left_arm: "AA".into(),
        }
    }

    #[test]
    fn rows_follow_header_order() {
        let results = vec![("GENE".to_string(), vec![hit(None), hit(Some(1200))])];
        let mut buf = Vec::new();
        let n = write_padlocks_csv(&mut buf, &results, &ThermoParams::default(), &Flat).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(lines[1], "GENE,ENST1,ENSE1,rev,-1,7,0,CCCTTTAA,ACGT,CCC,TTT,AA,3.123,2.123");
        assert!(lines[2].starts_with("GENE,ENST1,ENSE1,rev,1200,7,"));
    }

    #[test]
    fn empty_results_still_get_a_header() {
        let mut buf = Vec::new();
        let n = write_padlocks_csv(&mut buf, &[], &ThermoParams::default(), &Flat).unwrap();
        assert_eq!(n, 0);
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), HEADER.join(","));
    }
}
