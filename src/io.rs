//! Text format used by the command line tool.
//!
//! ## Input
//! The first line holds `M N K d`: the amount of vectors, their dimensionality, the amount of clusters
//! and the convergence constant. It is followed by exactly `M` lines of `N` real numbers each.
//! Values are separated by one or more blanks, blank lines are ignored.
//!
//! ## Output
//! `K` lines `<cluster_id> <centroid...>` with two decimals, one blank line, then `M` lines
//! `<cluster_id> <vector...>` in input order, with the vectors at full precision (shortest representation
//! that reads back to the same value, always with a fractional part: `4.0`, `0.33`, `1e-7`).

use crate::{KMeans, KMeansError, KMeansState, Primitive, Result};
use std::io::{BufRead, Write};

/// Upper limit of values reserved before any vector line was read.
const MAX_RESERVED_VALUES: usize = 1 << 20;

/// A parsed input file: the samples together with the requested clustering parameters.
#[derive(Debug)]
pub struct Problem<T: Primitive> {
    pub kmean: KMeans<T>,
    pub k: usize,
    pub d: T,
}

fn parse_value<T: Primitive>(line: usize, token: &str) -> Result<T> {
    let value: T = token.parse().map_err(|source| KMeansError::Parse { line, token: token.to_string(), source })?;
    if !value.is_finite() {
        return Err(KMeansError::InvalidData(format!("line {}: '{}' is not a finite number", line, token)));
    }
    Ok(value)
}

fn parse_count(line: usize, token: &str) -> Result<usize> {
    token.parse().map_err(|source| KMeansError::ParseCount { line, token: token.to_string(), source })
}

/// Read a clustering problem in the `M N K d` format.
pub fn parse_problem<T: Primitive, R: BufRead>(reader: R) -> Result<Problem<T>> {
    let mut lines = reader.lines().enumerate()
        .map(|(idx, line)| line.map(|l| (idx + 1, l)))
        .filter(|line| !matches!(line, Ok((_, l)) if l.trim().is_empty()));

    let (header_line, header) = lines.next()
        .ok_or_else(|| KMeansError::Shape("input is empty, expected a 'M N K d' header".into()))??;
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(KMeansError::Shape(format!(
            "line {}: header must hold the 4 values 'M N K d', found {}", header_line, tokens.len())));
    }
    let sample_cnt = parse_count(header_line, tokens[0])?;
    let sample_dims = parse_count(header_line, tokens[1])?;
    let k = parse_count(header_line, tokens[2])?;
    let d: T = parse_value(header_line, tokens[3])?;

    if sample_dims == 0 {
        return Err(KMeansError::InvalidConfig("N (dimensions) must be at least 1".into()));
    }
    if k == 0 || k > sample_cnt {
        return Err(KMeansError::InvalidConfig(format!("K must be within [1, M = {}], got {}", sample_cnt, k)));
    }

    // The header is untrusted, so only a bounded amount is reserved up front
    let mut samples = Vec::with_capacity(sample_cnt.saturating_mul(sample_dims).min(MAX_RESERVED_VALUES));
    let mut found = 0;
    for line in lines {
        let (line_nr, line) = line?;
        let before = samples.len();
        for token in line.split_whitespace() {
            samples.push(parse_value(line_nr, token)?);
        }
        let components = samples.len() - before;
        if components != sample_dims {
            return Err(KMeansError::Shape(format!(
                "line {}: expected {} components, found {}", line_nr, sample_dims, components)));
        }
        found += 1;
    }
    if found != sample_cnt {
        return Err(KMeansError::Shape(format!("declared {} vectors but found {}", sample_cnt, found)));
    }

    Ok(Problem { kmean: KMeans::new(samples, sample_cnt, sample_dims)?, k, d })
}

/// Write the centroids and the per-vector cluster assignments of a finished calculation.
pub fn write_result<T: Primitive, W: Write>(mut writer: W, kmean: &KMeans<T>, state: &KMeansState<T>) -> Result<()> {
    for cluster_id in 0..state.k {
        write!(writer, "{}", cluster_id)?;
        for v in state.centroid(cluster_id) {
            write!(writer, " {:.2}", v)?;
        }
        writeln!(writer)?;
    }
    writeln!(writer)?;
    for (sample_id, cluster_id) in state.assignments.iter().enumerate() {
        write!(writer, "{}", cluster_id)?;
        for v in kmean.sample(sample_id) {
            write!(writer, " {:?}", v)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
