use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use denticompare::models::{Clinic, ClinicTreatment, ComparisonEntry, Treatment, TreatmentOffering};
use denticompare::services::catalog::{apply_price_bounds, attach_treatment, PriceBounds};
use denticompare::services::compare::mark_best_value;
use std::hint::black_box;

const CLINICS: usize = 1000;

fn clinic(i: usize) -> Clinic {
    Clinic {
        clinic_id: format!("clinic-{:04}", i),
        name: format!("Clinic {}", i),
        description: String::new(),
        address: String::new(),
        city: ["Madrid", "Barcelona", "Valencia", "Sevilla", "Bilbao"][i % 5].to_string(),
        postal_code: String::new(),
        latitude: 40.0,
        longitude: -3.0,
        phone: String::new(),
        email: String::new(),
        image_url: String::new(),
        rating: 3.5 + (i % 15) as f64 / 10.0,
        review_count: i as u32,
        created_at: String::new(),
    }
}

fn link(i: usize) -> ClinicTreatment {
    ClinicTreatment {
        id: format!("ct_{:04}_implante-dental", i),
        clinic_id: format!("clinic-{:04}", i),
        treatment_id: "implante-dental".to_string(),
        price: 800.0 + (i % 700) as f64,
        duration_days: 60 + (i % 60) as u32,
        warranty_months: 24,
        process_steps: vec!["Consulta".to_string(), "Cirugía".to_string()],
        includes: vec!["Corona".to_string()],
    }
}

fn benchmark_search_pipeline(c: &mut Criterion) {
    let clinics: Vec<Clinic> = (0..CLINICS).map(clinic).collect();
    // Every other clinic offers the treatment
    let links: Vec<ClinicTreatment> = (0..CLINICS).step_by(2).map(link).collect();
    let bounds = PriceBounds {
        min: Some(990.0),
        max: Some(1200.0),
    };

    let mut group = c.benchmark_group("clinic_search");

    group.bench_function("attach_treatment", |b| {
        b.iter_batched(
            || clinics.clone(),
            |clinics| attach_treatment(clinics, black_box(&links)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("attach_and_bound", |b| {
        b.iter_batched(
            || clinics.clone(),
            |clinics| apply_price_bounds(attach_treatment(clinics, black_box(&links)), bounds),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn benchmark_best_value(c: &mut Criterion) {
    let treatment = Treatment {
        treatment_id: "implante-dental".to_string(),
        name: "Implante Dental".to_string(),
        description: String::new(),
        category: "Cirugía".to_string(),
        icon: String::new(),
    };
    let entries: Vec<ComparisonEntry> = (0..CLINICS)
        .map(|i| ComparisonEntry {
            clinic: clinic(i),
            treatment: TreatmentOffering::new(treatment.clone(), link(i)),
            is_best_value: false,
        })
        .collect();

    c.bench_function("mark_best_value", |b| {
        b.iter_batched(
            || entries.clone(),
            |mut entries| {
                mark_best_value(black_box(&mut entries));
                entries
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, benchmark_search_pipeline, benchmark_best_value);
criterion_main!(benches);
