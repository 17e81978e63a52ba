use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use email_core::{tokenize, validate};
use emails_editor::{EditorEvent, EmailsEditor, Key};
use surface::{DomSurface, Surface};

const SMALL_LIST: usize = 16;
const LARGE_LIST: usize = 2_000;

fn make_emails(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            if i % 5 == 0 {
                format!("broken-{i}.example")
            } else {
                format!("user.{i}+tag@mail-{}.example.org", i % 17)
            }
        })
        .collect()
}

fn seeded_editor(emails: &[String]) -> EmailsEditor<DomSurface> {
    let dom = DomSurface::new();
    let host = dom.body();
    let mut editor = EmailsEditor::builder(dom, host)
        .initial_emails(emails.iter().cloned())
        .build()
        .expect("bench editor builds");
    editor
        .handle_event(EditorEvent::Focus)
        .expect("focus succeeds");
    editor
}

fn bench_validate(c: &mut Criterion) {
    let emails = make_emails(LARGE_LIST);
    c.bench_function("bench_validate_large", |b| {
        b.iter(|| {
            let valid = emails.iter().filter(|e| validate(black_box(e))).count();
            black_box(valid);
        });
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let raw = make_emails(LARGE_LIST).join(", \n");
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(tokenize(black_box(&raw)).len()));
    });
}

fn bench_enter_pass(c: &mut Criterion, name: &str, count: usize) {
    let emails = make_emails(count);
    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                let mut editor = seeded_editor(&emails);
                editor
                    .surface_mut()
                    .insert_text("typed@example.com")
                    .expect("insert succeeds");
                editor
            },
            |mut editor| {
                editor
                    .handle_event(EditorEvent::KeyDown(Key::Enter))
                    .expect("pass succeeds");
                black_box(editor.get_emails().len());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_pass_small(c: &mut Criterion) {
    bench_enter_pass(c, "bench_pass_small", SMALL_LIST);
}

fn bench_pass_large(c: &mut Criterion) {
    bench_enter_pass(c, "bench_pass_large", LARGE_LIST);
}

fn bench_backspace_drain(c: &mut Criterion) {
    let emails = make_emails(SMALL_LIST);
    c.bench_function("bench_backspace_drain", |b| {
        b.iter_batched(
            || seeded_editor(&emails),
            |mut editor| {
                while !editor.get_emails().is_empty() {
                    editor
                        .handle_event(EditorEvent::KeyDown(Key::Backspace))
                        .expect("backspace succeeds");
                }
                black_box(editor);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_validate,
    bench_tokenize,
    bench_pass_small,
    bench_pass_large,
    bench_backspace_drain
);
criterion_main!(benches);
