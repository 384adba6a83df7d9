use std::collections::VecDeque;

use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use uuid::Uuid;

use tether::{BodyOps, Ownership, PhysicsBridge, Pose, RapierWorld, WireSnapshot};

const DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "tether-demo")]
#[command(about = "Two in-process peers reconciling rigid bodies over a jittery link")]
struct Args {
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    #[arg(long, default_value_t = 50, help = "One-way latency in ms")]
    latency: u32,

    #[arg(long, default_value_t = 30, help = "Delivery jitter in ms")]
    jitter: u32,

    #[arg(long, default_value_t = 60, help = "Report cadence in ticks")]
    report_every: u32,
}

/// Deterministic xorshift, good enough for delivery jitter.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn up_to(&mut self, max: u32) -> u32 {
        if max == 0 { 0 } else { (self.next() % (max as u64 + 1)) as u32 }
    }
}

struct Link {
    queue: VecDeque<(u32, Vec<u8>)>,
    latency_ticks: u32,
    jitter_ticks: u32,
}

impl Link {
    fn new(latency_ms: u32, jitter_ms: u32) -> Self {
        let per_tick = DT * 1000.0;
        Self {
            queue: VecDeque::new(),
            latency_ticks: (latency_ms as f32 / per_tick).round() as u32,
            jitter_ticks: (jitter_ms as f32 / per_tick).round() as u32,
        }
    }

    fn send(&mut self, now: u32, rng: &mut Rng, bytes: Vec<u8>) {
        let deliver = now + 1 + self.latency_ticks + rng.up_to(self.jitter_ticks);
        self.queue.push_back((deliver, bytes));
    }

    fn drain_due(&mut self, now: u32) -> Vec<Vec<u8>> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.queue.len() {
            if self.queue[i].0 <= now {
                due.push(self.queue.remove(i).unwrap().1);
            } else {
                i += 1;
            }
        }
        due
    }
}

struct Peer {
    name: &'static str,
    source: Uuid,
    world: RapierWorld,
    bridge: PhysicsBridge<RapierWorld>,
}

impl Peer {
    fn new(name: &'static str) -> Self {
        let mut world = RapierWorld::new();
        world.add_ground(0.0, 50.0);
        Self {
            name,
            source: Uuid::new_v4(),
            world,
            bridge: PhysicsBridge::new(),
        }
    }

    fn tick(&mut self, now: u32, inbound: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        for bytes in inbound {
            let (source, snapshot) = WireSnapshot::deserialize(&bytes)?.into_parts();
            self.bridge.add_snapshot(source, snapshot);
        }

        self.bridge.fixed_update(&mut self.world, &Pose::IDENTITY, DT);
        self.world.step();

        let snapshot = self
            .bridge
            .generate_snapshot(&self.world, now as f32 * DT, &Pose::IDENTITY);
        Ok(WireSnapshot::from_snapshot(self.source, &snapshot).serialize()?)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let ball = Uuid::new_v4();
    let crate_box = Uuid::new_v4();

    let mut peer_a = Peer::new("a");
    let mut peer_b = Peer::new("b");

    // Peer A owns a ball rolling toward peer B's crate; each peer mirrors
    // the other's body.
    let ball_a = peer_a
        .world
        .add_dynamic_sphere(Vec3::new(-4.0, 0.5, 0.0), 0.5, 1.0);
    peer_a
        .world
        .set_velocities(ball_a, Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
    let crate_a = peer_a.world.add_kinematic_box(Vec3::new(2.0, 0.5, 0.0), Vec3::splat(0.5));

    let ball_b = peer_b.world.add_kinematic_sphere(Vec3::new(-4.0, 0.5, 0.0), 0.5);
    let crate_b = peer_b
        .world
        .add_dynamic_box(Vec3::new(2.0, 0.5, 0.0), Vec3::splat(0.5), 2.0);

    peer_a
        .bridge
        .add_rigid_body(&mut peer_a.world, ball, ball_a, Ownership::Owned)?;
    peer_a
        .bridge
        .add_rigid_body(&mut peer_a.world, crate_box, crate_a, Ownership::Remote)?;
    peer_b
        .bridge
        .add_rigid_body(&mut peer_b.world, ball, ball_b, Ownership::Remote)?;
    peer_b
        .bridge
        .add_rigid_body(&mut peer_b.world, crate_box, crate_b, Ownership::Owned)?;

    let mut rng = Rng(0x5EED_5EED);
    let mut link_ab = Link::new(args.latency, args.jitter);
    let mut link_ba = Link::new(args.latency, args.jitter);

    log::info!(
        "running {} ticks at 60 Hz, {} ms latency, {} ms jitter",
        args.ticks,
        args.latency,
        args.jitter
    );

    for tick in 0..args.ticks {
        let to_b = peer_a.tick(tick, link_ba.drain_due(tick))?;
        link_ab.send(tick, &mut rng, to_b);

        let to_a = peer_b.tick(tick, link_ab.drain_due(tick))?;
        link_ba.send(tick, &mut rng, to_a);

        if args.report_every > 0 && tick % args.report_every == 0 {
            let a_ball = peer_a.world.position(ball_a);
            let b_ball = peer_b.world.position(ball_b);
            let stats = peer_b.bridge.debug_stats();
            log::info!(
                "tick {tick:4}: ball on {} ({:5.2},{:5.2}) mirror on {} ({:5.2},{:5.2}) monitored {}",
                peer_a.name,
                a_ball.x,
                a_ball.y,
                peer_b.name,
                b_ball.x,
                b_ball.y,
                stats.monitored,
            );
        }
    }

    let a_ball = peer_a.world.position(ball_a);
    let b_ball = peer_b.world.position(ball_b);
    log::info!(
        "done: ball at ({:.2},{:.2},{:.2}) on a, mirror at ({:.2},{:.2},{:.2}) on b, drift {:.3}",
        a_ball.x,
        a_ball.y,
        a_ball.z,
        b_ball.x,
        b_ball.y,
        b_ball.z,
        (a_ball - b_ball).length()
    );

    Ok(())
}
