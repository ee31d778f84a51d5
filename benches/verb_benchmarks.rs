//! 动词执行性能基准测试
//!
//! 测试动词分发、回调恢复、字幕布局和字幕脚本解析的性能

use adventure_engine::config::{AdventureConfig, TextConfig, UiConfig};
use adventure_engine::domain::{Scene, World};
use adventure_engine::project::{ChapterDocument, Project, ProjectDocument};
use adventure_engine::ui::credits::parse_credits;
use adventure_engine::ui::font::MonospaceFont;
use adventure_engine::ui::subtitle::SubtitleLayout;
use adventure_engine::verbs::{ActionSpec, Verb};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn world_with(verb: Verb) -> World {
    let mut project = Project::in_memory(ProjectDocument::new("bench"));
    project
        .save_chapter(&ChapterDocument::new("c1").with_scene(Scene::new("room").with_verb(verb)))
        .expect("in-memory chapter");
    let mut config = AdventureConfig::default();
    config.text = TextConfig {
        time_per_char: 0.0,
        min_time: 0.01,
    };
    let mut world = World::new(project, &config);
    world.load_init_chapter().expect("init chapter");
    world
}

fn bench_immediate_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("immediate_actions");

    for count in [10, 100, 1000].iter() {
        let mut verb = Verb::new("pan");
        for i in 0..*count {
            verb = verb.with_action(ActionSpec::new("camera").with_param("pos", format!("{},0", i)));
        }
        let mut world = world_with(verb);

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                black_box(world.run_verb(None, "pan"));
                world.drain_events();
            });
        });
    }
    group.finish();
}

fn bench_subtitle_resumes(c: &mut Criterion) {
    let mut verb = Verb::new("chatter");
    for i in 0..50 {
        verb = verb.with_action(ActionSpec::new("say").with_param("text", format!("Line {}", i)));
    }
    let mut world = world_with(verb);

    c.bench_function("subtitle_resumes", |b| {
        b.iter(|| {
            let id = world.run_verb(None, "chatter");
            while id.is_some_and(|id| world.is_running(id)) {
                world.skip_text();
            }
            world.drain_events();
        });
    });
}

fn bench_subtitle_layout(c: &mut Criterion) {
    use adventure_engine::actions::ResumeQueue;
    use adventure_engine::domain::camera::SceneCamera;
    use adventure_engine::domain::text::{Color, TextManager, TextPosition, TextType};
    use glam::Vec2;

    let font = MonospaceFont::default();
    let layout = SubtitleLayout::new(&UiConfig::default(), &font);
    let camera = SceneCamera::default();
    let mut manager = TextManager::new(TextConfig::default());
    let mut resumes = ResumeQueue::new();
    let text = "That's the second biggest monkey head I've ever seen! ".repeat(4);
    manager.add_subtitle(
        text,
        TextPosition::scene(Vec2::new(960.0, 400.0)),
        false,
        TextType::Talk,
        Color::BLACK,
        None,
        &mut resumes,
    );

    c.bench_function("subtitle_layout", |b| {
        b.iter(|| {
            if let Some(current) = manager.current_subtitle() {
                black_box(layout.layout(current, &camera, &font));
            }
        });
    });
}

fn bench_parse_credits(c: &mut Criterion) {
    let mut script = String::new();
    for i in 0..500 {
        script.push_str(&format!("t#Section {}\nc#Person {}\ns#20\n", i, i));
    }

    c.bench_function("parse_credits", |b| {
        b.iter(|| black_box(parse_credits(black_box(&script))));
    });
}

criterion_group!(
    benches,
    bench_immediate_actions,
    bench_subtitle_resumes,
    bench_subtitle_layout,
    bench_parse_credits
);
criterion_main!(benches);
