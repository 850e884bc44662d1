use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kmer_hash::contig::assemble_contig;
use kmer_hash::dashmaps::DashTable;
use kmer_hash::hash_map::DistributedHashMap;
use kmer_hash::kmer::{KmerPair, PackedKmer};
use kmer_hash::reader::KmerFile;
use kmer_hash::run::{assemble, AssemblyOptions};
use kmer_hash::table::{KmerTable, TableKind};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_kmers() -> Vec<KmerPair> {
    KmerFile::open(fixture_path("k19.txt"))
        .and_then(|file| file.all_kmers())
        .unwrap()
}

fn bench_parse_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("KmerPair::parse_line");

    for k in [7, 19, 31] {
        let line = format!("{} GC", &"GATTACA".repeat(5)[..k]);

        group.bench_with_input(BenchmarkId::from_parameter(k), &line, |b, line| {
            b.iter(|| KmerPair::parse_line(black_box(line.as_bytes()), 1))
        });
    }

    group.finish();
}

fn bench_hash(c: &mut Criterion) {
    let kmer: PackedKmer = "GATTACAGATTACAGATTA".parse().unwrap();
    c.bench_function("PackedKmer::hash64", |b| b.iter(|| black_box(&kmer).hash64()));
}

fn bench_insert(c: &mut Criterion) {
    let kmers = fixture_kmers();
    let mut group = c.benchmark_group("insert");

    group.bench_function("segmented", |b| {
        b.iter(|| {
            let table = DistributedHashMap::new(kmers.len(), 4);
            for pair in &kmers {
                table.insert(pair);
            }
            black_box(table.len())
        })
    });

    group.bench_function("dashmap", |b| {
        b.iter(|| {
            let table = DashTable::new(kmers.len(), 4);
            for pair in &kmers {
                table.insert(pair);
            }
            black_box(table.len())
        })
    });

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let kmers = fixture_kmers();
    let table = DistributedHashMap::new(kmers.len(), 1);
    for pair in &kmers {
        table.insert(pair);
    }
    let starts: Vec<KmerPair> = kmers.iter().copied().filter(KmerPair::is_start).collect();

    c.bench_function("assemble_contig", |b| {
        b.iter(|| {
            starts
                .iter()
                .map(|start| assemble_contig(&table, *start, table.len()).map(|c| c.len()))
                .sum::<Result<usize, _>>()
        })
    });
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let path = fixture_path("k19.txt");

    for ranks in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(ranks), &ranks, |b, &ranks| {
            let options = AssemblyOptions {
                ranks,
                expect_k: None,
                table: TableKind::Segmented,
            };
            b.iter(|| assemble(black_box(&path), &options))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_line,
    bench_hash,
    bench_insert,
    bench_walk,
    bench_assemble
);
criterion_main!(benches);
