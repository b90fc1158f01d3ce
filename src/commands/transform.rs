//! Offline record-set transforms
//!
//! Thin wrappers over [`harvest::records`]: load a record file, apply one
//! transform, write the result elsewhere. Inputs are never modified in place.

use anyhow::Result;
use harvest::records::{
    flatten_page_records, keep_longest_prop, load_records, prune_missing_documents, save_records,
    select_class,
};
use std::path::Path;

pub fn flatten(input: &Path, output: &Path) -> Result<()> {
    let mut records = load_records(input)?;
    let flattened = flatten_page_records(&mut records);
    save_records(output, &records)?;
    println!(
        "Flattened {} of {} records into {}",
        flattened,
        records.len(),
        output.display()
    );
    Ok(())
}

pub fn longest_prop(input: &Path, output: &Path) -> Result<()> {
    let records = load_records(input)?;
    let total = records.len();
    let reduced = keep_longest_prop(records);
    save_records(output, &reduced)?;
    println!(
        "Kept the longest prop for {} of {} records in {}",
        reduced.len(),
        total,
        output.display()
    );
    Ok(())
}

pub fn select_documents(input: &Path, output: &Path) -> Result<()> {
    let records = load_records(input)?;
    let documents = select_class(records, "Document");
    save_records(output, &documents)?;
    println!(
        "Found {} Document records; written to {}",
        documents.len(),
        output.display()
    );
    Ok(())
}

pub fn prune_missing(input: &Path, output: &Path) -> Result<()> {
    let records = load_records(input)?;
    let (kept, removed) = prune_missing_documents(records);
    save_records(output, &kept)?;
    println!(
        "Removed {} records with missing files; {} remain in {}",
        removed,
        kept.len(),
        output.display()
    );
    Ok(())
}
