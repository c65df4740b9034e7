use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Airports that have scenery files but no ground network yet, in tree
/// order. An airport counts as covered by either a groundnet or a parking
/// file next to its scenery XML.
pub fn missing_networks(scenery_airports: &Path) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    visit(scenery_airports, &mut seen, &mut missing)?;
    Ok(missing)
}

fn visit(dir: &Path, seen: &mut HashSet<String>, missing: &mut Vec<String>) -> Result<()> {
    let is_svn = dir
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.contains(".svn"));
    if is_svn {
        return Ok(());
    }
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if !name.ends_with(".xml") {
            continue;
        }
        let icao = match name.split('.').next() {
            Some(icao) if !icao.is_empty() => icao,
            _ => continue,
        };
        if dir.join(format!("{}.groundnet.xml", icao)).exists()
            || dir.join(format!("{}.parking.xml", icao)).exists()
        {
            continue;
        }
        if seen.insert(icao.to_owned()) {
            missing.push(icao.to_owned());
        }
    }
    for sub in subdirs {
        visit(&sub, seen, missing)?;
    }
    Ok(())
}

pub fn read_cache(cache: &Path) -> Result<Vec<String>> {
    let buf = fs::read_to_string(cache)?;
    Ok(buf
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect())
}

pub fn write_cache(cache: &Path, missing: &[String]) -> Result<()> {
    fs::write(cache, missing.join("\n"))?;
    Ok(())
}

/// ICAO codes that already have a network under the output directory.
pub fn done_airports(output_dir: &Path, tree: bool) -> Vec<String> {
    let root = if tree {
        output_dir.join("Airports")
    } else {
        output_dir.to_path_buf()
    };
    let mut done = Vec::new();
    collect_xml_stems(&root, &mut done);
    done
}

// Missing directories just mean nothing was written yet.
fn collect_xml_stems(dir: &Path, out: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_xml_stems(&path, out);
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if !name.ends_with(".xml") {
            continue;
        }
        if let Some(icao) = name.split('.').next() {
            out.push(icao.to_owned());
        }
    }
}

/// Writes one rendered document, either flat or into the
/// `Airports/<c0>/<c1>/<c2>/` scenery-style tree.
pub fn save_network(output_dir: &Path, icao: &str, document: &str, tree: bool) -> Result<PathBuf> {
    if icao.len() != 3 && icao.len() != 4 {
        return Err(Error::UnsupportedIcao {
            icao: icao.to_owned(),
        });
    }
    let dir = if tree {
        let mut dir = output_dir.join("Airports");
        for c in icao.chars().take(3) {
            dir.push(c.to_string());
        }
        dir
    } else {
        output_dir.to_path_buf()
    };
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.groundnet.xml", icao));
    fs::write(&path, document)?;
    Ok(path)
}
