use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use interspace::prelude::*;

struct A;

struct B;

#[derive(Default)]
struct Subscriber {
    entities: EntitySet,
}

impl System for Subscriber {
    fn entities(&self) -> &EntitySet {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut EntitySet {
        &mut self.entities
    }
}

/// Measures membership re-dispatch under component churn: every iteration
/// flips each entity in and out of the subscribed system once.
fn benchmark(c: &mut Criterion) {
    const COUNT: u32 = 4096;

    let mut world = World::with_capacity(COUNT);

    let a = world.register_component::<A>();

    world.register_component::<B>();
    world.register_system(Subscriber::default(), Signature::EMPTY.with(a));

    let entities: Vec<_> = (0..COUNT)
        .map(|_| {
            let entity = world.spawn().unwrap();

            world.insert(entity, B).unwrap();

            entity
        })
        .collect();

    c.benchmark_group("dispatch").bench_function("signature_churn", |bencher| {
        bencher.iter(|| {
            for &entity in &entities {
                world.insert(entity, black_box(A)).unwrap();
                world.remove::<A>(entity).unwrap();
            }
        })
    });
}

criterion_group!(
    name = this;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(4));
    targets = benchmark,
);
criterion_main!(this);
