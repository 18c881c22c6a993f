use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use obj_ref_replacer::io::{DefaultTableReader, DefaultTextReader, DefaultTextWriter, TextReader, TextWriter};
use obj_ref_replacer::utils::{create_backup, is_supported_table_file, MANUAL_PASTE_MESSAGE};
use obj_ref_replacer::{
    ClipboardService, CopyOutcome, RefError, Session, Settings, SubstitutionReport,
    SUPPORTED_EXTENSIONS, VERSION,
};

#[derive(Parser)]
#[command(name = "obj_ref_replacer")]
#[command(about = "把 PL/SQL 文本中的数字对象引用ID替换为CSV中的引用名称")]
#[command(version = VERSION)]
struct Cli {
    /// 对象引用CSV文件路径 (OBJ_ID, OBJ_TYPE, OBJ_REF)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// 输入文本文件路径，"-" 表示标准输入
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 输出文件路径（默认输出到标准输出）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 直接改写输入文件（会先创建备份）
    #[arg(long)]
    in_place: bool,

    /// 不包装为 id.get('...')，直接输出引用名称
    #[arg(long)]
    no_id_get: bool,

    /// 引用名称前缀（自动转为小写并去除空白）
    #[arg(long)]
    prefix: Option<String>,

    /// CSV分隔符（默认 ","）
    #[arg(long)]
    delimiter: Option<char>,

    /// JSON配置文件路径（也可通过 OBJ_REF_CONFIG 环境变量指定）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 逆操作：把 id.get('name') 还原为 name
    #[arg(long)]
    remove_id_get: bool,

    /// 把结果复制到剪贴板
    #[arg(long)]
    copy: bool,

    /// 从剪贴板读取输入文本
    #[arg(long)]
    paste: bool,

    /// 显示替换统计信息（输出到标准错误）
    #[arg(long)]
    stats: bool,

    /// 把解析后的引用表导出为JSON
    #[arg(long)]
    dump_table: Option<PathBuf>,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    validate_options(&cli)?;

    let settings = load_settings(&cli)?;
    let mut session = Session::from_settings(&settings);
    let mut clipboard = ClipboardService::detect();

    if let Some(table_path) = &cli.table {
        handle_table_loading(&cli, &mut session, table_path)?;
    }

    if let Some(dump_path) = &cli.dump_table {
        handle_table_dump(&cli, &session, dump_path)?;
        if cli.input.is_none() && !cli.paste {
            return Ok(());
        }
    }

    handle_input(&cli, &mut session, &mut clipboard)?;

    // 处理不同的操作模式
    if cli.remove_id_get {
        handle_remove_accessor(&cli, &mut session);
    } else {
        let report = handle_substitution(&mut session, &settings)?;
        if cli.stats && !cli.quiet {
            print_substitution_summary(&session, &report);
        }
    }

    handle_output(&cli, &session, &mut clipboard)
}

/// 初始化日志（RUST_LOG 控制级别，输出到标准错误）
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obj_ref_replacer=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 验证选项组合
fn validate_options(cli: &Cli) -> Result<()> {
    if cli.in_place {
        match &cli.input {
            Some(path) if path.as_os_str() != "-" => {}
            _ => bail!("--in-place 需要通过 --input 指定输入文件"),
        }
        if cli.output.is_some() {
            bail!("--in-place 与 --output 不能同时使用");
        }
    }

    if cli.paste && cli.input.is_some() {
        bail!("只能使用一种输入方式：--input 或 --paste");
    }

    if !cli.remove_id_get && cli.table.is_none() && cli.dump_table.is_none() {
        bail!(RefError::MissingReferenceTable);
    }

    if cli.dump_table.is_some() && cli.table.is_none() {
        bail!("--dump-table 需要通过 --table 指定引用表");
    }

    Ok(())
}

/// 加载配置并应用命令行覆盖
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::resolve(cli.config.as_deref()).context("加载配置失败")?;

    if cli.no_id_get {
        settings.wrap_accessor = false;
    }
    if let Some(prefix) = &cli.prefix {
        settings.prefix = prefix.clone();
    }
    if let Some(delimiter) = cli.delimiter {
        settings.delimiter = delimiter;
    }

    settings.validate().context("配置无效")?;
    Ok(settings)
}

/// 加载引用表
fn handle_table_loading(cli: &Cli, session: &mut Session, table_path: &Path) -> Result<()> {
    if !table_path.exists() {
        bail!("引用表文件不存在: {:?}", table_path);
    }

    if !is_supported_table_file(table_path) && !cli.quiet {
        eprintln!(
            "警告: {:?} 不是常见的引用表格式 {:?}，仍按CSV解析",
            table_path, SUPPORTED_EXTENSIONS
        );
    }

    let count = session
        .load_table_from(&DefaultTableReader, table_path)
        .with_context(|| format!("读取引用表失败: {:?}", table_path))?;

    if !cli.quiet {
        eprintln!("已加载 {} 条对象引用: {:?}", count, table_path);
    }

    if cli.stats && !cli.quiet {
        if let Some(stats) = session.table_stats() {
            eprint!("{}", stats);
        }
    }

    Ok(())
}

/// 导出引用表为JSON
fn handle_table_dump(cli: &Cli, session: &Session, dump_path: &Path) -> Result<()> {
    let table = session.table().cloned().unwrap_or_default();
    let json = table.to_json().context("序列化引用表失败")?;

    DefaultTextWriter
        .write_text(&json, dump_path)
        .with_context(|| format!("写入文件失败: {:?}", dump_path))?;

    if !cli.quiet {
        eprintln!("引用表已导出到: {:?}", dump_path);
    }

    Ok(())
}

/// 读取输入文本到会话
fn handle_input(cli: &Cli, session: &mut Session, clipboard: &mut ClipboardService) -> Result<()> {
    if cli.paste {
        return match session.paste(clipboard) {
            Ok(()) => Ok(()),
            Err(RefError::ClipboardUnavailable(_)) => bail!(MANUAL_PASTE_MESSAGE),
            Err(e) => Err(e.into()),
        };
    }

    match &cli.input {
        Some(path) if path.as_os_str() == "-" => session.set_text(read_stdin()?),
        Some(path) => {
            if !path.exists() {
                bail!("输入文件不存在: {:?}", path);
            }
            let text = DefaultTextReader
                .read_text(path)
                .with_context(|| format!("读取输入文件失败: {:?}", path))?;
            session.set_text(text);
        }
        // 没有指定输入时，管道输入优先，否则保留占位文本
        None if !std::io::stdin().is_terminal() => session.set_text(read_stdin()?),
        None => {}
    }

    Ok(())
}

/// 从标准输入读取全部文本
fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("从标准输入读取失败")?;
    Ok(buffer)
}

/// 执行ID替换
fn handle_substitution(session: &mut Session, settings: &Settings) -> Result<SubstitutionReport> {
    session
        .substitute(&settings.substitute_options())
        .map_err(|e| match e {
            RefError::MissingReferenceTable => anyhow::anyhow!(e),
            other => anyhow::Error::new(other).context("替换失败"),
        })
}

/// 去除 id.get 包装
fn handle_remove_accessor(cli: &Cli, session: &mut Session) {
    let changed = session.remove_accessor();
    if !cli.quiet && !changed {
        eprintln!("没有找到 id.get('...') 表达式");
    }
}

/// 输出结果
fn handle_output(cli: &Cli, session: &Session, clipboard: &mut ClipboardService) -> Result<()> {
    let text = session.text();

    if cli.in_place {
        if let Some(input) = &cli.input {
            let backup_path = create_backup(input).context("创建备份失败")?;
            DefaultTextWriter
                .write_text(&text, input)
                .with_context(|| format!("写入文件失败: {:?}", input))?;
            if !cli.quiet {
                eprintln!("已改写 {:?}，备份文件: {:?}", input, backup_path);
            }
        }
    } else if let Some(output) = &cli.output {
        DefaultTextWriter
            .write_text(&text, output)
            .with_context(|| format!("写入文件失败: {:?}", output))?;
        if !cli.quiet {
            eprintln!("结果已写入: {:?}", output);
        }
    }

    if cli.copy {
        let mut stdout = std::io::stdout().lock();
        match session.copy(clipboard, &mut stdout)? {
            CopyOutcome::Native => {
                if !cli.quiet {
                    eprintln!("结果已复制到剪贴板");
                }
            }
            CopyOutcome::Manual => {
                if !cli.quiet {
                    eprintln!("系统剪贴板不可用或退出后不保留内容，结果已输出到标准输出，请手动复制");
                }
            }
        }
        return Ok(());
    }

    if !cli.in_place && cli.output.is_none() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// 打印替换摘要信息
fn print_substitution_summary(session: &Session, report: &SubstitutionReport) {
    eprint!("{}", report);
    eprintln!("{}", session.summary());
}
