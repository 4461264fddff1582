use uniwin_core::WindowHandle;

#[cfg(windows)]
pub fn execute(json: bool) {
    let windows: Vec<WindowHandle> = uniwin_core::find_windows(&uniwin_windows::Win32Api)
        .into_iter()
        .filter(|w| !w.title.is_empty())
        .collect();
    print(&windows, json);
}

#[cfg(not(windows))]
pub fn execute(_json: bool) {
    super::unsupported();
}

#[cfg_attr(not(windows), allow(dead_code))]
pub fn print(windows: &[WindowHandle], json: bool) {
    if json {
        match serde_json::to_string_pretty(windows) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        return;
    }
    print!("{}", render_table(windows));
    println!("\n{} windows found", windows.len());
}

/// Formats windows as aligned columns.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn render_table(windows: &[WindowHandle]) -> String {
    let rows: Vec<[String; 5]> = windows
        .iter()
        .map(|w| {
            [
                format!("0x{:X}", w.hwnd),
                w.process_id.to_string(),
                w.process_name.clone(),
                w.class_name.clone(),
                w.title.clone(),
            ]
        })
        .collect();

    let header = ["HWND", "PID", "Process", "Class", "Title"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 5]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_row(header);
    for row in &rows {
        push_row([&row[0], &row[1], &row[2], &row[3], &row[4]]);
    }
    out
}
