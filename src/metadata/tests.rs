use super::*;
use crate::error::{format, logical, MzTabError};
use crate::section::TableKind;

fn parse(lines: &[&str]) -> (MetadataParser, Vec<MzTabError>) {
    let mut parser = MetadataParser::new();
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        parser.parse_line(i + 1, &fields, &mut issues);
    }
    (parser, issues)
}

const MINIMAL: &[&str] = &[
    "MTD\tmzTab-version\t1.0.0",
    "MTD\tmzTab-mode\tSummary",
    "MTD\tmzTab-type\tIdentification",
    "MTD\tdescription\tminimal file",
    "MTD\tms_run[1]-location\tfile:///data/run1.mzML",
];

#[test]
fn test_minimal_metadata_is_complete() {
    let (parser, issues) = parse(MINIMAL);
    assert!(issues.is_empty(), "{:?}", issues);

    let mut issues = Vec::new();
    let metadata = parser.finish(6, &mut issues);
    assert!(issues.is_empty(), "{:?}", issues);
    assert_eq!(metadata.version.as_deref(), Some("1.0.0"));
    assert_eq!(metadata.mode, Some(Mode::Summary));
    assert_eq!(metadata.mztab_type, Some(MzTabType::Identification));
    assert_eq!(
        metadata.ms_runs[&1].location.as_deref(),
        Some("file:///data/run1.mzML")
    );
}

#[test]
fn test_invalid_reagent_keeps_assay() {
    let (parser, issues) = parse(&[
        "MTD\tassay[2]-quantification_reagent\t[PRIDE, PRIDE:0000115, iTRAQ",
        "MTD\tassay[2]-ms_run_ref\tms_run[1]",
        "MTD\tassay[2]-sample_ref\tsample[3]",
    ]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].error_type, format::PARAM);
    assert_eq!(issues[0].line, 1);

    let assay = &parser.metadata().assays[&2];
    assert_eq!(assay.quantification_reagent, None);
    assert_eq!(assay.ms_run_ref, Some(1));
    assert_eq!(assay.sample_ref, Some(3));
}

#[test]
fn test_properties_arrive_in_any_order() {
    let (parser, issues) = parse(&[
        "MTD\tms_run[2]-format\t[MS, MS:1000584, mzML file, ]",
        "MTD\tms_run[1]-location\tfile:///a.mzML",
        "MTD\tms_run[2]-location\tfile:///b.mzML",
        "MTD\tms_run[1]-id_format\t[MS, MS:1000530, mzML unique identifier, ]",
    ]);
    assert!(issues.is_empty(), "{:?}", issues);
    let runs = &parser.metadata().ms_runs;
    assert_eq!(runs.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert!(runs[&1].id_format.is_some());
    assert!(runs[&2].format.is_some());
}

#[test]
fn test_indexed_sub_properties() {
    let (parser, issues) = parse(&[
        "MTD\tsample[1]-species[1]\t[NEWT, 9606, Homo sapiens (Human), ]",
        "MTD\tsample[1]-description\tHealthy human liver tissue",
        "MTD\tinstrument[1]-analyzer[2]\t[MS, MS:1000484, orbitrap, ]",
        "MTD\tsoftware[1]-setting[1]\tFragment tolerance = 0.1 Da",
        "MTD\tassay[1]-quantification_mod[1]-site\tK",
        "MTD\tassay[1]-quantification_mod[1]\t[UNIMOD, UNIMOD:188, Label:13C(6), ]",
        "MTD\tstudy_variable[1]-assay_refs\tassay[1], assay[2]",
        "MTD\tcv[1]-url\thttps://github.com/HUPO-PSI/psi-ms-CV",
        "MTD\tprotein_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]",
        "MTD\tcolunit-protein\treliability=[MS, MS:00001231, PeptideProphet:Score, ]",
        "MTD\tsmall_molecule-quantification_unit\t[PRIDE, PRIDE:0000395, Ratio, ]",
    ]);
    assert!(issues.is_empty(), "{:?}", issues);

    let md = parser.metadata();
    assert_eq!(md.samples[&1].species[&1].accession, "9606");
    assert_eq!(md.instruments[&1].analyzers[&2].name, "orbitrap");
    assert_eq!(md.software[&1].settings.len(), 1);
    let quant_mod = &md.assays[&1].quantification_mods[&1];
    assert_eq!(quant_mod.site.as_deref(), Some("K"));
    assert!(quant_mod.param.is_some());
    assert_eq!(md.study_variables[&1].assay_refs, vec![1, 2]);
    assert_eq!(md.search_engine_score_ids(TableKind::Protein), vec![1]);
    assert_eq!(md.column_units[0].column, "reliability");
    assert!(md.quantification_units.contains_key(&TableKind::SmallMolecule));
}

#[test]
fn test_key_errors() {
    let (parser, issues) = parse(&[
        "MTD\tms_run[0]-location\tfile:///a.mzML",
        "MTD\tms_run[x]-location\tfile:///a.mzML",
        "MTD\tms_run[1]-colour\tblue",
        "MTD\tfavourite_colour\tblue",
        "MTD\tcolunit-spectra\tx=[, , y, ]",
    ]);
    let types: Vec<_> = issues.iter().map(|e| e.error_type).collect();
    assert_eq!(
        types,
        vec![
            format::INDEXED_ELEMENT,
            format::INDEXED_ELEMENT,
            format::METADATA_KEY,
            format::METADATA_KEY,
            format::METADATA_KEY,
        ]
    );
    assert_eq!(issues[2].line, 3);
    // An unknown sub-property does not create the entity
    assert!(parser.metadata().ms_runs.is_empty());
}

#[test]
fn test_duplicate_definition_keeps_first_value() {
    let (parser, issues) = parse(&[
        "MTD\ttitle\tfirst",
        "MTD\ttitle\tsecond",
    ]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].error_type, logical::DUPLICATE_DEFINITION);
    assert_eq!(issues[0].line, 2);
    assert_eq!(parser.metadata().title.as_deref(), Some("first"));
}

#[test]
fn test_field_count() {
    let (_, issues) = parse(&["MTD\ttitle", "MTD\ttitle\ta\tb"]);
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|e| e.error_type == format::COUNT_MATCH));
    assert_eq!(issues[0].message, "Line has 2 fields but 3 were expected");
}

#[test]
fn test_trailing_tab_is_accepted() {
    let (parser, issues) = parse(&["MTD	title	Serum proteome	", "MTD	description	label free		"]);
    assert!(issues.is_empty(), "{:?}", issues);
    assert_eq!(parser.metadata().title.as_deref(), Some("Serum proteome"));
    assert_eq!(parser.metadata().description.as_deref(), Some("label free"));
}

#[test]
fn test_value_grammars() {
    let (parser, issues) = parse(&[
        "MTD\tmzTab-mode\tFull",
        "MTD\tmzTab-type\tQuantitation",
        "MTD\tcontact[1]-email\tnobody",
        "MTD\tpublication[1]\tpubmed:21063943|doi:10.1038/nmeth.1716",
        "MTD\tassay[1]-ms_run_ref\tms_run[1], ms_run[2]",
        "MTD\turi[1]\thttp://www.ebi.ac.uk/pride/url/to/experiment",
    ]);
    let types: Vec<_> = issues.iter().map(|e| e.error_type).collect();
    assert_eq!(
        types,
        vec![
            format::MZTAB_MODE,
            format::MZTAB_TYPE,
            format::EMAIL,
            format::INDEXED_REF,
        ]
    );
    let md = parser.metadata();
    assert_eq!(md.publications[&1].items.len(), 2);
    assert!(md.contacts[&1].email.is_none());
    assert_eq!(md.uris.len(), 1);
}

#[test]
fn test_finish_reports_missing_mandatory_metadata() {
    let (parser, issues) = parse(&[
        "MTD\tmzTab-version\t1.0.0",
        "MTD\tms_run[2]-format\t[MS, MS:1000584, mzML file, ]",
    ]);
    assert!(issues.is_empty());

    let mut issues = Vec::new();
    parser.finish(3, &mut issues);
    let messages: Vec<_> = issues.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Mandatory metadata \"mzTab-mode\" is not defined",
            "Mandatory metadata \"mzTab-type\" is not defined",
            "Mandatory metadata \"description\" is not defined",
            "Mandatory metadata \"ms_run[2]-location\" is not defined",
        ]
    );
    assert!(issues.iter().all(|e| e.line == 3));
}
