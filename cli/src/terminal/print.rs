use colored::*;

pub const TOTAL_WIDTH: usize = 64;

pub fn banner(no_banner: bool) {
    if no_banner {
        return;
    }

    let text_content: String = format!("⟦ MTUNE v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = text_content.chars().count();
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();

    println!("{}{}{}", sep, text, sep);
    println!(
        "{}",
        "Break through throttled tunnels by right-sizing the MTU"
            .italic()
            .bright_black()
    );
    println!();
}

pub fn status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".bright_black();
    println!("{} {}", prefix, msg.as_ref());
}

pub fn success<T: AsRef<str>>(msg: T) {
    println!("{} {}", "[+]".green().bold(), msg.as_ref().bold());
}
