use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    response::bench_content_length_body,
    response::bench_body_until_close,
    response::bench_header_heavy_response
);
criterion_main!(benches);
