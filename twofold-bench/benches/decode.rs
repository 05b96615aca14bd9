use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use twofold::wave::AudioBuffer;

/// One second of stereo noise at 44.1 kHz as a WAVE buffer.
fn noise_wave(bits: u16) -> Vec<u8> {
    let rate = 44_100u32;
    let channels = 2u16;
    let block = channels * (bits / 8);
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..rate as usize * usize::from(block))
        .map(|_| rng.gen())
        .collect();

    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&rate.to_le_bytes());
    out.extend_from_slice(&(rate * u32::from(block)).to_le_bytes());
    out.extend_from_slice(&block.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&data);
    out
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_wave");
    for bits in [8u16, 16, 24, 32] {
        let bytes = noise_wave(bits);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("f32", bits), &bytes, |b, bytes| {
            b.iter(|| AudioBuffer::<f32>::from_wave_bytes(bytes).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("f64", bits), &bytes, |b, bytes| {
            b.iter(|| AudioBuffer::<f64>::from_wave_bytes(bytes).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
