use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::prelude::{AntennaError, AntennaResult};
use crate::response::data::{GridPoint, ResponseData};
use crate::response::table::ResponseTable;

/// Reads a response table file and validates its grid.
pub fn load_response_file<P: AsRef<Path>>(path: P) -> AntennaResult<ResponseTable> {
    let data = read_response_data(path.as_ref())?;
    let table = ResponseTable::from_data(&data)?;
    info!(
        "loaded response table {} ({} frequencies, {} grid points)",
        path.as_ref().display(),
        table.frequencies().len(),
        data.len()
    );
    Ok(table)
}

/// Reads the raw grid points of a response file without checking completeness.
pub fn read_response_data<P: AsRef<Path>>(path: P) -> AntennaResult<ResponseData> {
    let file = File::open(path.as_ref())?;
    parse_response_data(BufReader::new(file))
}

/// Parses the line-oriented response format.
///
/// `freq ... <value> <unit>` opens a frequency block, `SWR ... <value>` records
/// the standing wave ratio of the current block, and five-column rows
/// `<theta> <phi> <dB gain> <gain> <phase>` add grid points to it. Everything
/// else is skipped.
pub fn parse_response_data<R: BufRead>(reader: R) -> AntennaResult<ResponseData> {
    let mut data = ResponseData::new();
    let mut current: Option<f64> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let words: Vec<&str> = line.split_whitespace().collect();

        if line.starts_with("freq") {
            let frequency = parse_frequency(&words).ok_or_else(|| AntennaError::DataFormat {
                line: number,
                text: line.clone(),
            })?;
            data.add_frequency(frequency);
            current = Some(frequency);
        } else if line.starts_with("SWR") {
            match (current, words.last().and_then(|w| w.parse::<f64>().ok())) {
                (Some(frequency), Some(swr)) => data.set_swr(frequency, swr),
                _ => debug!("ignoring SWR line {}: '{}'", number, line),
            }
        } else if words.len() == 5 && words[0] != "Theta" {
            let Some(frequency) = current else {
                warn!("grid row {} precedes any frequency block, skipping", number);
                continue;
            };
            let (theta, phi, point) =
                parse_grid_row(&words).ok_or_else(|| AntennaError::DataFormat {
                    line: number,
                    text: line.clone(),
                })?;
            data.insert(frequency, theta, phi, point);
        }
    }

    Ok(data)
}

fn parse_frequency(words: &[&str]) -> Option<f64> {
    if words.len() < 2 {
        return None;
    }
    let scale = match words[words.len() - 1] {
        "Hz" => 1.0,
        "kHz" => 1e3,
        "MHz" => 1e6,
        "GHz" => 1e9,
        _ => return None,
    };
    let value: f64 = words[words.len() - 2].parse().ok()?;
    Some(value * scale)
}

fn parse_grid_row(words: &[&str]) -> Option<(i32, i32, GridPoint)> {
    let theta = words[0].parse().ok()?;
    let phi = words[1].parse().ok()?;
    // words[2] is the gain in dB, redundant with the linear gain
    words[2].parse::<f64>().ok()?;
    let gain = words[3].parse().ok()?;
    let phase = words[4].parse().ok()?;
    Some((theta, phi, GridPoint { gain, phase }))
}
