//! Interactive company lookup against the metadata file.

use std::io::{self, BufRead, Write};

use crate::index::MetadataIndex;
use crate::resolver::rank_matches;

/// Number of fuzzy candidates offered for selection.
pub const MAX_CHOICES: usize = 5;

/// Prints the metadata record for `company`.
///
/// An exact (case-insensitive) match is printed directly. Otherwise, with
/// `fuzzy` set, up to [`MAX_CHOICES`] word-overlap candidates are listed and
/// the user picks one by number or quits with `q`.
pub fn find_company<R: BufRead, W: Write>(
    company: &str,
    index: &MetadataIndex,
    fuzzy: bool,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    if let Some(meta) = index.id_for_name(company).and_then(|id| index.metadata(id)) {
        writeln!(out, "Found exact match for '{company}':")?;
        writeln!(out, "{}", to_pretty_json(meta)?)?;
        return Ok(());
    }

    if !fuzzy {
        writeln!(
            out,
            "No exact match found for '{company}'. Use --fuzzy to enable fuzzy matching."
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "No exact match found for '{company}'. Trying fuzzy matching..."
    )?;
    let matches = rank_matches(company, index, usize::MAX);
    if matches.is_empty() {
        writeln!(out, "No matches found for '{company}'.")?;
        return Ok(());
    }

    writeln!(out, "Found {} potential matches:", matches.len())?;
    let choices: Vec<_> = matches
        .iter()
        .take(MAX_CHOICES)
        .filter_map(|m| index.metadata(m.id).map(|meta| (m.score, meta)))
        .collect();
    for (i, (score, meta)) in choices.iter().enumerate() {
        writeln!(out, "\n{}. '{}' (score: {}):", i + 1, meta.company_name, score)?;
        writeln!(out, "   SHA1: {}", meta.sha1)?;
        writeln!(out, "   Industry: {}", meta.major_industry)?;
    }

    loop {
        write!(
            out,
            "\nEnter the number of the match to show full details (or 'q' to quit): "
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        match choice.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => {
                writeln!(out, "\nFull metadata:")?;
                writeln!(out, "{}", to_pretty_json(choices[n - 1].1)?)?;
                return Ok(());
            }
            Ok(_) => writeln!(out, "Invalid choice. Please try again.")?,
            Err(_) => writeln!(out, "Invalid input. Please enter a number or 'q'.")?,
        }
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
