use std::time::Instant;

fn main() {
    let start = Instant::now();

    if let Err(err) = agents::train_learning_vs_heuristic() {
        eprintln!("match aborted: {err}");
    }
    //agents::play_human_vs_learning();

    println!();
    println!(
        "It took {:.1} second(s) to complete.",
        start.elapsed().as_secs_f32()
    );
}
