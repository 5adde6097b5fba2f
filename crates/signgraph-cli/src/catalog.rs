//! Provisioning outside of import jobs: sources, region labels, counts.

use anyhow::{anyhow, Result};
use colored::Colorize;
use signgraph_ingest::resolve;
use signgraph_store::{
    fields, EntityKind, EntityStore, FieldValue, SourceRepository, Storage, StoreSources,
};

pub(crate) fn cmd_source_add(storage: &Storage, identifier: &str, title: Option<&str>) -> Result<()> {
    let sources = StoreSources::new(storage.store());
    let existed = sources.find_by_identifier(identifier)?.is_some();
    let source = sources.provision(identifier, title)?;
    storage.flush()?;

    let verb = if existed { "exists" } else { "added" };
    println!(
        "{} source {} (id {})",
        verb.green().bold(),
        source.identifier.bold(),
        source.id
    );
    Ok(())
}

/// Register a region label on a page, creating the page record if needed.
pub(crate) fn cmd_label_add(storage: &Storage, source: &str, page: i64, name: &str) -> Result<()> {
    let store = storage.store();
    let source = StoreSources::new(store)
        .find_by_identifier(source)?
        .ok_or_else(|| anyhow!("source `{source}` is not provisioned; run `signgraph source add` first"))?;

    let page_record = resolve(
        store,
        EntityKind::AnnotationPage,
        fields([
            ("source", FieldValue::Ref(source.id)),
            ("page_number", FieldValue::Int(page)),
        ]),
        Default::default(),
    )?;
    let label = resolve(
        store,
        EntityKind::Label,
        fields([
            ("annotation_page", FieldValue::Ref(page_record.id())),
            ("label_name", FieldValue::text(name.trim())),
        ]),
        Default::default(),
    )?;
    storage.flush()?;

    let verb = if label.created { "added" } else { "exists" };
    println!(
        "{} label {} on page {} of {} (id {})",
        verb.green().bold(),
        name.trim().bold(),
        page,
        source.identifier,
        label.id()
    );
    Ok(())
}

pub(crate) fn cmd_stats(storage: &Storage) -> Result<()> {
    let store = storage.store();
    println!("{} {}", "Store".bold(), storage.config().store_path.display());
    for kind in EntityKind::ALL {
        println!("  {:<20} {:>8}", kind.as_str(), store.count(kind)?);
    }
    println!("  {:<20} {:>8}", "total", store.len());
    Ok(())
}
