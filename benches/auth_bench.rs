//! Benchmarks for the credential directory and session store
//!
//! Run with: cargo bench

use bepawa::auth::*;
use bepawa::storage::{FileStore, MemoryStore};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::rc::Rc;
use tempfile::tempdir;

fn create_test_records(count: usize, hasher: &CredentialHasher) -> Vec<IdentityRecord> {
    let hash = hasher.hash("bench").unwrap();
    (0..count)
        .map(|i| IdentityRecord {
            id: i.to_string(),
            email: format!("user{}@bench.com", i),
            name: format!("User {}", i),
            role: Role::Individual,
            password_hash: hash.clone(),
            is_approved: true,
            created_at: Utc::now(),
            profile: Profile::default(),
        })
        .collect()
}

fn bench_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory");
    let hasher = CredentialHasher::insecure_fast();

    for size in [10, 100, 1000] {
        let records = create_test_records(size, &hasher);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("kv_find_last_of_{}", size), |b| {
            let dir = KvDirectory::new(MemoryStore::new());
            dir.seed(records.clone()).unwrap();
            let email = format!("USER{}@bench.com", size - 1);

            b.iter(|| dir.find_by_email(black_box(&email)).unwrap())
        });

        #[cfg(feature = "sqlite")]
        group.bench_function(format!("sqlite_find_last_of_{}", size), |b| {
            let dir = SqliteDirectory::in_memory().unwrap();
            dir.seed(records.clone()).unwrap();
            let email = format!("USER{}@bench.com", size - 1);

            b.iter(|| dir.find_by_email(black_box(&email)).unwrap())
        });
    }

    group.bench_function("file_insert_into_100", |b| {
        let tmp = tempdir().unwrap();
        let dir = KvDirectory::new(FileStore::open(tmp.path()).unwrap());
        let base = create_test_records(100, &hasher);
        let extra = create_test_records(101, &hasher).pop().unwrap();

        b.iter(|| {
            dir.seed(base.clone()).unwrap();
            dir.insert(black_box(extra.clone())).unwrap()
        })
    });

    group.finish();
}

fn bench_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("credentials");
    group.sample_size(10);

    let default_cost = CredentialHasher::default();
    let hash = default_cost.hash("admin123").unwrap();

    group.bench_function("hash_default_cost", |b| {
        b.iter(|| default_cost.hash(black_box("admin123")).unwrap())
    });

    group.bench_function("verify_default_cost", |b| {
        b.iter(|| default_cost.verify(black_box("admin123"), &hash))
    });

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    group.bench_function("login_logout", |b| {
        let storage = Rc::new(MemoryStore::new());
        let mut session = SessionStore::new(KvDirectory::new(Rc::clone(&storage)), storage)
            .hasher(CredentialHasher::insecure_fast());
        session.initialize();

        b.iter(|| {
            session.login(black_box("admin@bepawa.com"), "admin123").unwrap();
            session.logout();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_directory, bench_hashing, bench_session);
criterion_main!(benches);
