use criterion::{Criterion, criterion_group, criterion_main};

use reportero::{
    artifact::ImageArtifact,
    record::{ItemPatch, ProcesVerbal},
    registry::store::Registry,
    types::{PhotoAngle, SignatureParty},
    validate::is_finalize_eligible,
};

fn doc(title: &str, items: usize) -> ProcesVerbal {
    let mut doc = ProcesVerbal::new();
    doc.title = title.to_string();
    for idx in 0..items {
        let id = doc.add_item();
        doc.update_item(
            id,
            &ItemPatch {
                name: Some(format!("Obiect {idx}")),
                ..ItemPatch::default()
            },
        );
        for angle in PhotoAngle::ALL {
            doc.set_photo(id, angle, ImageArtifact::jpeg(b"stub"));
        }
    }
    doc.set_signature(SignatureParty::Predator, ImageArtifact::png(b"sig"));
    doc.set_signature(SignatureParty::Primitor, ImageArtifact::png(b"sig"));
    doc
}

fn bench_upserts(c: &mut Criterion) {
    c.bench_function("registry_upsert_1k", |b| {
        b.iter(|| {
            let mut registry = Registry::in_memory();
            for i in 0..1_000 {
                registry
                    .upsert(doc(&format!("Predare {i}"), 1))
                    .expect("upsert");
            }
        });
    });
}

fn bench_eligibility(c: &mut Criterion) {
    let doc = doc("Predare Echipament", 100);
    c.bench_function("eligibility_100_items", |b| {
        b.iter(|| is_finalize_eligible(&doc));
    });
}

fn bench_snapshot_serialize(c: &mut Criterion) {
    let mut registry = Registry::in_memory();
    for i in 0..100 {
        registry
            .upsert(doc(&format!("Predare {i}"), 2))
            .expect("upsert");
    }
    c.bench_function("snapshot_serialize_100", |b| {
        b.iter(|| serde_json::to_vec(&registry.export_snapshot()).expect("serialize"));
    });
}

criterion_group!(
    benches,
    bench_upserts,
    bench_eligibility,
    bench_snapshot_serialize
);
criterion_main!(benches);
