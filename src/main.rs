use clap::Parser;
use fountain_html::{load_options, parse_fountain_file, FountainError, FountainResult, LinesPerPage, ParserOptions};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fountain-parser")]
#[command(about = "把 Fountain 剧本解析为 HTML 片段和分页结果，输出 JSON")]
struct Args {
    /// 剧本文件路径
    input: PathBuf,

    /// JSON格式的解析选项文件，命令行参数会覆盖其中的设置
    #[arg(long)]
    config: Option<PathBuf>,

    /// 每页行数预设: none, loose, normal, tight, very_tight
    #[arg(long)]
    lines_per_page: Option<LinesPerPage>,

    #[arg(long)]
    no_paginate: bool,

    /// 输出完整的剧本HTML
    #[arg(long)]
    html: bool,

    /// 输出HTML片段数组
    #[arg(long)]
    html_array: bool,

    #[arg(long)]
    no_notes: bool,

    #[arg(long)]
    no_draft_date: bool,

    #[arg(long)]
    no_boneyard: bool,

    /// 附带原始 token 列表
    #[arg(long)]
    tokens: bool,

    /// 输出文件，默认写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> FountainResult<ParserOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => ParserOptions::default(),
        };

        if let Some(lines_per_page) = self.lines_per_page {
            options.lines_per_page = lines_per_page;
        }
        options.paginate &= !self.no_paginate;
        options.emit_script_html |= self.html;
        options.emit_script_html_array |= self.html_array;
        options.include_notes &= !self.no_notes;
        options.include_draft_date &= !self.no_draft_date;
        options.include_boneyard &= !self.no_boneyard;
        options.include_tokens |= self.tokens;
        Ok(options)
    }
}

fn run(args: &Args) -> FountainResult<()> {
    let options = args.options()?;
    let document = parse_fountain_file(&args.input, options)?;

    info!(
        "{}: {} 个场景, {} 页",
        args.input.display(),
        document.scenes.len(),
        document.script_pages.len()
    );

    let json = serde_json::to_string_pretty(&document).map_err(FountainError::Serialize)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("结果已保存到: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("解析失败: {}", e);
            ExitCode::FAILURE
        }
    }
}
