//! Terminal output.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use biograph_core::api::SearchHit;
use biograph_core::graph::{Category, GraphView, MergeStats};
use biograph_core::publications::{CatalogStats, Publication, PublicationPage};
use biograph_core::Scalar;

use crate::session::Session;

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No matches.");
        return;
    }
    for hit in hits {
        let id = hit.key().unwrap_or_else(|| "-".to_string());
        let label = hit.label.as_deref().unwrap_or("");
        println!("{:>10}  {:<22}  {}", id, label, hit.title());
    }
    println!();
    println!("Use 'biograph open <name>' or 'biograph expand <id>' to add one to the graph.");
}

pub fn merge_summary(origin: &str, stats: &MergeStats, session: &Session) {
    println!(
        "{}: +{} nodes, +{} edges",
        origin, stats.added_nodes, stats.added_edges
    );
    if stats.dropped_nodes > 0 || stats.dropped_links > 0 {
        println!(
            "  skipped {} nodes without id, {} links without endpoints",
            stats.dropped_nodes, stats.dropped_links
        );
    }
    let visibility = session.explorer.visibility();
    session.explorer.with_store(|store| {
        println!(
            "  graph: {} nodes ({} visible), {} edges ({} visible)",
            store.node_count(),
            visibility.visible_node_count(),
            store.edge_count(),
            visibility.visible_edge_count()
        );
    });
}

pub fn filters(session: &Session) {
    let counts = session.explorer.counts();
    let filters = session.explorer.filters();

    println!("{:<24} {:>7} {:>8} {:>6}", "CATEGORY", "STORED", "ENABLED", "LIMIT");
    for (category, filter) in filters.iter() {
        let stored = counts.get(&category).copied().unwrap_or(0);
        println!(
            "{:<24} {:>7} {:>8} {:>6}",
            category.as_str(),
            stored,
            if filter.enabled { "yes" } else { "no" },
            filter.limit
        );
    }
    let publications = counts.get(&Category::Publication).copied().unwrap_or(0);
    println!(
        "{:<24} {:>7} {:>8} {:>6}",
        Category::Publication.as_str(),
        publications,
        "always",
        "-"
    );
}

pub fn view(view: &GraphView, all: bool) {
    let nodes: Vec<_> = view.nodes.iter().filter(|n| all || n.visible).collect();
    let edges: Vec<_> = view.edges.iter().filter(|e| all || !e.hidden).collect();

    if nodes.is_empty() {
        println!("The graph is empty. Try 'biograph search <term>'.");
        return;
    }

    println!("Nodes ({}):", nodes.len());
    for node in nodes {
        let marker = if node.visible { ' ' } else { '-' };
        println!(
            "{}{:>9}  {:<22}  {}  @({:.0}, {:.0})",
            marker, node.id, node.category, node.label, node.position.x, node.position.y
        );
    }

    println!();
    println!("Edges ({}):", edges.len());
    for edge in edges {
        let marker = if edge.hidden { '-' } else { ' ' };
        println!(
            "{}{} -[{}]-> {}",
            marker, edge.source, edge.label, edge.target
        );
    }
}

pub fn status(session: &Session) {
    let visibility = session.explorer.visibility();
    let query = session.explorer.query();
    let results = session.explorer.results();

    println!("Backend:     {}", session.config.api.base_url_trimmed());
    println!("State dir:   {}", session.state_dir.display());
    println!("Limit rule:  {:?}", session.config.graph.limit_policy);
    session.explorer.with_store(|store| {
        println!(
            "Graph:       {} nodes ({} visible), {} edges ({} visible)",
            store.node_count(),
            visibility.visible_node_count(),
            store.edge_count(),
            visibility.visible_edge_count()
        );
    });
    if !query.is_empty() {
        println!("Last search: '{}' ({} results)", query, results.len());
    }
    println!();
    filters(session);
}

pub fn papers(page: &PublicationPage) {
    if page.publications.is_empty() {
        println!("No publications found.");
        return;
    }
    for item in &page.publications {
        let year = item.year.as_ref().map(ToString::to_string).unwrap_or_default();
        let pdf = if item.has_pdf() { "pdf" } else { "" };
        println!(
            "{:<12} {:<6} {:<3}  {}",
            item.pmcid.as_deref().unwrap_or("-"),
            year,
            pdf,
            item.title_or_default()
        );
    }
    println!();
    println!(
        "Page {} of {} ({} total)",
        page.page, page.total_pages, page.total
    );
}

pub fn paper(item: &Publication, pdf_url: Option<&str>) {
    println!("{}", item.title_or_default());
    if !item.authors.is_empty() {
        println!("  {}", item.authors.join(", "));
    }
    let journal = item.journal.as_deref().unwrap_or("Unknown journal");
    match &item.year {
        Some(year) => println!("  {} ({})", journal, year),
        None => println!("  {}", journal),
    }
    if let Some(doi) = &item.doi {
        println!("  doi: {}", doi);
    }
    if !item.categories.is_empty() {
        println!("  categories: {}", item.categories.join(", "));
    }
    if let Some(url) = pdf_url {
        println!("  pdf: {}", url);
    }
    if let Some(text) = item.abstract_text.as_deref().filter(|t| !t.trim().is_empty()) {
        println!();
        println!("{}", text.trim());
    }
}

pub fn catalog_stats(stats: &CatalogStats) {
    let bound = |v: &Option<Scalar>| v.as_ref().map(ToString::to_string).unwrap_or_else(|| "?".into());

    println!("Publications: {}", stats.total_publications);
    println!(
        "Years:        {} - {}",
        bound(&stats.year_range.min),
        bound(&stats.year_range.max)
    );
    println!(
        "PDFs:         {} downloaded ({}, {} MB)",
        stats.pdf_statistics.total_pdfs_downloaded,
        stats.pdf_statistics.pdf_success_rate,
        stats.pdf_statistics.total_pdf_size_mb
    );
    println!(
        "Distinct:     {} categories, {} journals, {} authors",
        stats.categories_count, stats.journals_count, stats.authors_count
    );

    for (title, entries) in [
        ("Top categories", &stats.top_categories),
        ("Top journals", &stats.top_journals),
        ("Top authors", &stats.top_authors),
    ] {
        if entries.is_empty() {
            continue;
        }
        println!();
        println!("{}:", title);
        for entry in entries.iter().take(10) {
            println!("  {:>5}  {}", entry.count, entry.name);
        }
    }
}
