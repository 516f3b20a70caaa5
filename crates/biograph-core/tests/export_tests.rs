use biograph_core::export::{pdf_links, to_bibtex, to_csv, to_ris, ExportFormat};
use biograph_core::{Publication, Scalar};

fn bone_paper() -> Publication {
    Publication {
        pmcid: Some("PMC4136787".to_string()),
        title: Some("Microgravity induces pelvic bone loss\nthrough osteoclastic activity".to_string()),
        authors: vec!["Blaber EA".to_string(), "Dvorochkin N".to_string()],
        year: Some(Scalar::from(2013i64)),
        journal: Some("PLoS One".to_string()),
        doi: Some("10.1371/journal.pone.0061372".to_string()),
        volume: Some(Scalar::from("8")),
        issue: Some(Scalar::from("4")),
        pdf_downloaded: true,
        ..Publication::default()
    }
}

fn bare_paper() -> Publication {
    Publication {
        title: Some("Plants on \"orbit\"".to_string()),
        ..Publication::default()
    }
}

#[test]
fn test_csv() {
    let csv = to_csv(&[bone_paper(), bare_paper()]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "pmcid,title,authors,journal,year,doi,pdf_available");
    assert_eq!(
        lines[1],
        "\"PMC4136787\",\"Microgravity induces pelvic bone loss through osteoclastic activity\",\
         \"Blaber EA; Dvorochkin N\",\"PLoS One\",\"2013\",\"10.1371/journal.pone.0061372\",\"true\""
    );
    assert_eq!(
        lines[2],
        "\"\",\"Plants on \"\"orbit\"\"\",\"\",\"\",\"\",\"\",\"false\""
    );
}

#[test]
fn test_csv_quotes_separators_and_collapses_breaks() {
    let item = Publication {
        pmcid: Some("PMC1".to_string()),
        title: Some("Bone, muscle\r\n\nand \"load\"".to_string()),
        authors: vec!["Smith, J".to_string(), "Doe\nA".to_string()],
        ..Publication::default()
    };

    let csv = to_csv(&[item]).unwrap();
    assert_eq!(
        csv,
        "pmcid,title,authors,journal,year,doi,pdf_available\n\
         \"PMC1\",\"Bone, muscle and \"\"load\"\"\",\"Smith, J; Doe A\",\"\",\"\",\"\",\"false\""
    );
}

#[test]
fn test_csv_without_items_is_header_only() {
    assert_eq!(
        to_csv(&[]).unwrap(),
        "pmcid,title,authors,journal,year,doi,pdf_available"
    );
}

#[test]
fn test_bibtex() {
    let bib = to_bibtex(&[bone_paper()]);
    let expected = "@article{PMC4136787_2013,\n\
        \x20 title = {Microgravity induces pelvic bone loss through osteoclastic activity},\n\
        \x20 author = {Blaber EA and Dvorochkin N},\n\
        \x20 journal = {PLoS One},\n\
        \x20 year = {2013},\n\
        \x20 volume = {8},\n\
        \x20 number = {4},\n\
        \x20 doi = {10.1371/journal.pone.0061372}\n\
        }\n\n";
    assert_eq!(bib, expected);
}

#[test]
fn test_bibtex_without_year() {
    let bib = to_bibtex(&[bare_paper()]);
    assert!(bib.starts_with("@article{Plantsonorbit_n.d.,\n"));
    assert!(bib.contains("  title = {Plants on \"orbit\"}\n}"));
}

#[test]
fn test_ris() {
    let ris = to_ris(&[bone_paper()]);
    let expected = "TY  - JOUR\n\
        TI  - Microgravity induces pelvic bone loss through osteoclastic activity\n\
        AU  - Blaber EA\n\
        AU  - Dvorochkin N\n\
        JO  - PLoS One\n\
        PY  - 2013\n\
        VL  - 8\n\
        IS  - 4\n\
        DO  - 10.1371/journal.pone.0061372\n\
        ER  - \n\n";
    assert_eq!(ris, expected);
}

#[test]
fn test_pdf_links() {
    let links = pdf_links(&[bone_paper(), bare_paper()], "http://localhost:8000/");
    assert_eq!(links, vec!["http://localhost:8000/pdf/PMC4136787"]);
}

#[test]
fn test_render_dispatch() {
    let items = [bone_paper()];
    assert_eq!(ExportFormat::Csv.render(&items).unwrap(), to_csv(&items).unwrap());
    assert_eq!(ExportFormat::Bibtex.default_file_name(), "export.bib");
    assert!(ExportFormat::Ris.render(&[]).unwrap().is_empty());
}
