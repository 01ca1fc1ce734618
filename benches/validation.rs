use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mztab::config::ValidatorConfig;
use mztab::parser::{MzTabParser, NoProgress};
use std::io::Write;
use tempfile::TempDir;

const METADATA: &str = "\
MTD\tmzTab-version\t1.0.0
MTD\tmzTab-mode\tSummary
MTD\tmzTab-type\tIdentification
MTD\tdescription\tbenchmark
MTD\tms_run[1]-location\tfile:///data/run1.mzML
MTD\tpsm_search_engine_score[1]\t[MS, MS:1001330, X!Tandem:expect, ]
PSH\tsequence\tPSM_ID\taccession\tunique\tdatabase\tdatabase_version\tsearch_engine\tsearch_engine_score[1]\tmodifications\tretention_time\tcharge\texp_mass_to_charge\tcalc_mass_to_charge\tspectra_ref\tpre\tpost\tstart\tend
";

/// Create an mzTab document with `num_psms` PSM lines
fn create_psm_document(num_psms: usize) -> String {
    let mut text = String::from(METADATA);
    for i in 0..num_psms {
        text.push_str(&format!(
            "PSM\tKVPQVSTPTLVEVSR\t{}\tP02768\t0\tUniProtKB\t2013_08\t[MS, MS:1001476, X!Tandem, ]\t{:.4}\t{}\t{:.2}\t{}\t{:.4}\t{:.4}\tms_run[1]:index={}\tK\tD\t45\t57\n",
            i + 1,
            0.0001 * (i % 100) as f64,
            if i % 3 == 0 { "3-UNIMOD:35" } else { "0" },
            10.0 + i as f64 * 0.01,
            2 + i % 3,
            800.0 + (i % 500) as f64,
            800.0 + (i % 500) as f64 + 0.001,
            i
        ));
    }
    text
}

/// Benchmark validating in-memory documents
fn bench_validate_str(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_str");
    let parser = MzTabParser::new(ValidatorConfig::default());

    for num_psms in [1_000, 10_000, 50_000] {
        let text = create_psm_document(num_psms);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}psms", num_psms)),
            &text,
            |b, text| {
                b.iter(|| {
                    let outcome = parser.parse_str(black_box(text), &NoProgress).unwrap();
                    black_box(outcome.is_valid());
                });
            },
        );
    }

    group.finish();
}

/// Benchmark validating gzip-compressed files from disk
fn bench_validate_gzip_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_gzip_file");
    let parser = MzTabParser::new(ValidatorConfig::default());

    let num_psms = 10_000;
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("bench.mzTab.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        std::fs::File::create(&file_path).unwrap(),
        flate2::Compression::default(),
    );
    encoder
        .write_all(create_psm_document(num_psms).as_bytes())
        .unwrap();
    encoder.finish().unwrap();

    group.throughput(Throughput::Elements(num_psms as u64));
    group.bench_function("10000psms", |b| {
        b.iter(|| {
            let outcome = parser.parse_file(&file_path, &NoProgress).unwrap();
            black_box(outcome.is_valid());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_validate_str, bench_validate_gzip_file);
criterion_main!(benches);
