//! Performance benchmarks for critical client systems

use bincode::{deserialize, serialize};
use client::board::Board;
use client::bullet::BulletScheduler;
use shared::{Heading, Packet, Tank, COLS, EMPTY_CODE, ROWS};
use std::time::Instant;

/// Benchmarks a full scheduler tick with many live bullets
#[test]
fn benchmark_bullet_scheduler_tick() {
    let board = Board::new();
    let mut scheduler = BulletScheduler::new();
    for i in 0..100 {
        let y = (i % ROWS) as i32;
        scheduler
            .spawn(&format!("b-{}", i), 0, y, Heading::Right, "leo")
            .unwrap();
    }

    let iterations = 10;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = scheduler.step(&board);
    }

    let duration = start.elapsed();
    println!(
        "Scheduler tick: 100 bullets x {} ticks in {:?} ({:.2} us/tick)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // A tick fires every 500ms; stepping must be far cheaper than that
    assert!(duration.as_millis() < 100);
}

/// Benchmarks board snapshot loading
#[test]
fn benchmark_board_resync() {
    let snapshot = vec![vec![EMPTY_CODE.to_string(); COLS]; ROWS];
    let mut board = Board::new();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        board.load(&snapshot);
    }

    let duration = start.elapsed();
    println!(
        "Board resync: {} loads in {:?} ({:.2} us/load)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks packet serialization throughput
#[test]
fn benchmark_packet_serialization() {
    let packet = Packet::Joined {
        tank: Tank::new("leo", 1, 8, 0, "#fa0a0a"),
        board: vec![vec![EMPTY_CODE.to_string(); COLS]; ROWS],
        roster: vec![
            Tank::new("leo", 1, 8, 0, "#fa0a0a"),
            Tank::new("mia", 13, 1, 90, "#001ba1"),
        ],
    };

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let data = serialize(&packet).unwrap();
        let _: Packet = deserialize(&data).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Packet roundtrip: {} iterations in {:?} ({:.2} us/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}
