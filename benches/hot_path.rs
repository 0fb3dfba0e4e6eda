use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chatbridge::image::{extract_images, DataUrlResolver, ImageObject};
use chatbridge::models::ModelCatalog;
use chatbridge::{
    extract_directive, process_line, robustness_content, LineParser, Message, MessageFormatter,
    StreamProcessor,
};

fn chat_delta_line(content_len: usize) -> String {
    let content = "x".repeat(content_len);
    format!(
        r#"{{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1700000000,"model":"gpt-4o","choices":[{{"index":0,"delta":{{"content":"{content}"}},"finish_reason":null}}]}}"#
    )
}

fn stream_lines(count: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(count * 2 + 1);
    for _ in 0..count {
        lines.push(format!("data: {}", chat_delta_line(16)));
        lines.push(String::new());
    }
    lines.push("data: [DONE]".to_string());
    lines
}

fn prompt_with_text(len: usize, suffix: &str) -> String {
    let mut text = "lorem ipsum ".repeat(len / 12 + 1);
    text.truncate(len);
    text.push_str(suffix);
    text
}

fn bench_process_line(c: &mut Criterion) {
    let small = chat_delta_line(16);
    let large = chat_delta_line(4096);
    let error_line =
        r#"{"error":{"message":"Rate limit reached","type":"rate_limit_error","code":null}}"#;
    let completion_line = r#"{"id":"cmpl-1","choices":[{"text":" world","index":0}]}"#;

    c.bench_function("process_line_chat_delta_16b", |b| {
        b.iter(|| black_box(process_line(black_box(&small), false)));
    });
    c.bench_function("process_line_chat_delta_4k", |b| {
        b.iter(|| black_box(process_line(black_box(&large), false)));
    });
    c.bench_function("process_line_provider_error", |b| {
        b.iter(|| black_box(process_line(black_box(error_line), false)));
    });
    c.bench_function("process_line_completion", |b| {
        b.iter(|| black_box(process_line(black_box(completion_line), true)));
    });
}

fn bench_robustness(c: &mut Criterion) {
    let garbled = r#"{"choices":[{"delta":{"content":"partial \"quoted\" text"}"#;
    let no_content = "x".repeat(4096);
    let parser = LineParser::default().with_robustness_fallback(true);

    c.bench_function("robustness_content_hit", |b| {
        b.iter(|| black_box(robustness_content(black_box(garbled))));
    });
    c.bench_function("robustness_content_miss_4k", |b| {
        b.iter(|| black_box(robustness_content(black_box(&no_content))));
    });
    c.bench_function("process_line_with_fallback", |b| {
        b.iter(|| black_box(parser.process_line(black_box(garbled), false)));
    });
}

fn bench_stream_processor(c: &mut Criterion) {
    let lines = stream_lines(256);

    c.bench_function("stream_processor_256_deltas", |b| {
        b.iter(|| {
            let response = StreamProcessor::new(LineParser::default(), false)
                .process_lines(black_box(&lines))
                .expect("stream");
            black_box(response.content.len())
        });
    });
}

fn bench_directive(c: &mut Criterion) {
    let plain = prompt_with_text(4096, "");
    let tagged = prompt_with_text(4096, " /no_think");

    c.bench_function("extract_directive_4k_absent", |b| {
        b.iter(|| black_box(extract_directive(black_box(&plain))));
    });
    c.bench_function("extract_directive_4k_present", |b| {
        b.iter(|| black_box(extract_directive(black_box(&tagged))));
    });
}

fn bench_vision_formatting(c: &mut Criterion) {
    let text = prompt_with_text(
        1024,
        " https://img.example.com/a.png https://img.example.com/b.jpg",
    );
    let catalog = ModelCatalog::with_vision(["vl"]);
    let formatter = MessageFormatter::new(&catalog, &DataUrlResolver);
    let messages = vec![Message::system("describe"), Message::user(text.clone())];

    c.bench_function("extract_images_1k_two_urls", |b| {
        b.iter(|| black_box(extract_images(black_box(&text), true)));
    });
    c.bench_function("format_messages_vision_1k", |b| {
        b.iter(|| {
            let mut buffer: Vec<ImageObject> = Vec::new();
            black_box(formatter.format_messages(black_box(&messages), "vl", &mut buffer))
        });
    });
}

criterion_group!(
    benches,
    bench_process_line,
    bench_robustness,
    bench_stream_processor,
    bench_directive,
    bench_vision_formatting
);
criterion_main!(benches);
