//! Space Cannon headless runner
//!
//! Presents a `GameScene`, replays a scripted sequence of contact reports
//! against it, and prints a JSON report of what the scene saw.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::Vec2;
    use serde::{Deserialize, Serialize};

    use space_cannon::sim::{BodyId, ContactStats, Counters, GameScene, PhysicsBody, Scene};
    use space_cannon::{SceneView, Settings};

    #[derive(Parser, Debug)]
    #[command(name = "space-cannon")]
    #[command(about = "Drive a Space Cannon scene headless and replay contact reports")]
    struct Cli {
        /// Settings JSON (defaults plus SPACE_CANNON_* overrides when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Contact script JSON
        #[arg(long)]
        script: Option<PathBuf>,

        /// Steps to run (defaults to one past the last scripted frame)
        #[arg(long)]
        frames: Option<u64>,
    }

    /// Bodies to register and the contacts to report, keyed by step
    #[derive(Debug, Default, Deserialize)]
    struct ContactScript {
        #[serde(default)]
        bodies: Vec<PhysicsBody>,
        #[serde(default)]
        events: Vec<ScriptEvent>,
    }

    #[derive(Debug, Deserialize)]
    struct ScriptEvent {
        /// Reported just before this step runs
        frame: u64,
        #[serde(flatten)]
        action: ScriptAction,
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "kind", rename_all = "lowercase")]
    enum ScriptAction {
        Begin {
            a: String,
            b: String,
            #[serde(default)]
            point: Vec2,
            #[serde(default)]
            normal: Vec2,
            #[serde(default)]
            impulse: f32,
        },
        End {
            a: String,
            b: String,
        },
        Remove {
            body: String,
        },
    }

    #[derive(Debug, Serialize)]
    struct Report {
        frames: u64,
        contacts_begun: u64,
        contacts_ended: u64,
        counters: Counters,
    }

    pub fn main() -> Result<()> {
        env_logger::init();
        log::info!("Space Cannon (headless) starting...");

        let cli = Cli::parse();

        let settings = match &cli.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("load settings from {}", path.display()))?,
            None => Settings::from_env(),
        };

        let script = match &cli.script {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("read script {}", path.display()))?;
                serde_json::from_str::<ContactScript>(&json).context("parse contact script")?
            }
            None => ContactScript::default(),
        };

        let report = run(&settings, script, cli.frames)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
        Ok(())
    }

    fn run(settings: &Settings, script: ContactScript, frames: Option<u64>) -> Result<Report> {
        let mut scene = GameScene::from_settings(settings).context("build scene")?;
        let names = register_bodies(&mut scene, script.bodies)?;

        let mut events = script.events;
        events.sort_by_key(|e| e.frame);
        let frames = match (frames, events.last()) {
            (Some(frames), _) => frames,
            (None, Some(last)) => match last.frame.checked_add(1) {
                Some(frames) => frames,
                None => bail!("script frame {} is out of range", last.frame),
            },
            (None, None) => 0,
        };

        let mut view = SceneView::new(settings).context("build view")?;
        view.present_scene(scene);

        let mut pending = events.into_iter().peekable();
        for frame in 0..frames {
            let Some(scene) = view.scene_mut() else {
                bail!("scene was taken mid-run");
            };
            while let Some(event) = pending.next_if(|e| e.frame == frame) {
                apply(scene, &names, event.action)
                    .with_context(|| format!("script event at frame {}", frame))?;
            }
            view.step();
        }
        if let Some(event) = pending.next() {
            log::warn!(
                "Script events from frame {} on were not reached ({} frames run)",
                event.frame,
                frames
            );
        }

        let scene = view.take_scene().context("no scene presented")?;
        let ContactStats { begun, ended } = scene.contact_stats();
        Ok(Report {
            frames,
            contacts_begun: begun,
            contacts_ended: ended,
            counters: scene.counters(),
        })
    }

    fn register_bodies(
        scene: &mut GameScene,
        bodies: Vec<PhysicsBody>,
    ) -> Result<HashMap<String, BodyId>> {
        let mut names = HashMap::new();
        for body in bodies {
            let Some(name) = body.name.clone() else {
                bail!("script bodies must be named");
            };
            if names.contains_key(&name) {
                bail!("duplicate body name {:?}", name);
            }
            let id = scene.physics_world_mut().add_body(body)?;
            names.insert(name, id);
        }
        log::info!("Registered {} bodies", names.len());
        Ok(names)
    }

    fn apply(
        scene: &mut GameScene,
        names: &HashMap<String, BodyId>,
        action: ScriptAction,
    ) -> Result<()> {
        let lookup = |name: &str| {
            names
                .get(name)
                .copied()
                .with_context(|| format!("unknown body {:?}", name))
        };
        let world = scene.physics_world_mut();

        match action {
            ScriptAction::Begin {
                a,
                b,
                point,
                normal,
                impulse,
            } => {
                if !world.report_contact(lookup(&a)?, lookup(&b)?, point, normal, impulse)? {
                    log::debug!("contact {} <-> {} not reported", a, b);
                }
            }
            ScriptAction::End { a, b } => {
                if !world.report_separation(lookup(&a)?, lookup(&b)?)? {
                    log::debug!("{} and {} were not touching", a, b);
                }
            }
            ScriptAction::Remove { body } => {
                world.remove_body(lookup(&body)?)?;
            }
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
