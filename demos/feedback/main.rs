use std::time::Instant;

use sentiment_wcloud::{count_range, preview, Message, PhraseTokenizer, Score, WordCloud};

const FEEDBACK: &[(&str, f64)] = &[
    ("Muito obrigado amigo, atendimento excelente!", 0.12),
    ("atendimento excelente e entrega rápida", 0.2),
    ("A entrega atrasou de novo", 0.91),
    ("entrega atrasou, produto chegou com defeito", 0.88),
    ("Produto com defeito e suporte lento", 0.95),
    ("suporte lento", 0.7),
    ("tanto faz", 0.5),
    ("Ótimo preço, recomendo demais", 0.05),
    ("otimo preco", 0.3),
    ("a fila da loja estava enorme", 0.82),
];

pub fn main() {
    let messages: Vec<Message> = FEEDBACK
        .iter()
        .map(|(text, score)| Message::new(*text, Score::try_from(*score).expect("valid score")))
        .collect();

    let wordcloud = WordCloud::default()
        .with_tokenizer(PhraseTokenizer::default().with_max_words(20))
        .with_spread(1.2);

    let now = Instant::now();
    let entries = wordcloud.build(&messages);
    let positioned = wordcloud.layout(&entries);
    println!("Laid out {} entries in {}us", positioned.len(), now.elapsed().as_micros());

    for entry in &positioned {
        println!(
            "{:>28} {:>2} {:?} left={:.1}% top={:.1}% z={}",
            entry.entry.word,
            entry.entry.count,
            entry.entry.sentiment,
            entry.left,
            entry.top,
            entry.z_index
        );
    }

    let (min, max) = count_range(&entries).unwrap_or((0, 0));
    let background = preview::parse_background("#101014").expect("valid color");
    let image = preview::draw_layout(&positioned, min, max, 860, 860, background);
    preview::save_preview(&image, "demos/feedback/cloud.png").expect("Unable to save image");
}
