// なぞり経路ソルバ - コマンドライン

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use orbpath::application::{ProgressMessage, SolverService};
use orbpath::domain::board::{generator, Board};
use orbpath::domain::search::{Axis, Priority, SolveResult, SolverConfig};
use orbpath::logging;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AxisArg {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriorityArg {
    MaxClusters,
    MinSteps,
}

#[derive(Parser, Debug)]
#[command(name = "orbpath")]
#[command(about = "6x6 盤面のなぞり経路をビーム探索で求める")]
#[command(group(ArgGroup::new("source").args(["board", "fixed", "random"])))]
struct Args {
    /// 36個のセルコード（行優先、カンマ区切り）
    #[arg(long, allow_hyphen_values = true)]
    board: Option<String>,

    /// 既定の固定盤面を使う
    #[arg(long)]
    fixed: bool,

    /// ランダム盤面を使う
    #[arg(long)]
    random: bool,

    /// ランダム盤面のシード
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// 探索設定の JSON ファイル（以下のフラグで上書き）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 目標コンボ数（省略時は盤面の理論最大）
    #[arg(short, long)]
    target: Option<u32>,

    #[arg(long, value_enum)]
    axis: Option<AxisArg>,

    #[arg(long, value_enum)]
    priority: Option<PriorityArg>,

    /// 落ちコンを数える
    #[arg(long)]
    chain: bool,

    /// 斜め移動を禁止
    #[arg(long)]
    no_diagonal: bool,

    #[arg(long)]
    beam_width: Option<usize>,

    #[arg(long)]
    max_steps: Option<u32>,

    #[arg(long)]
    max_nodes: Option<u64>,

    /// 各ステップの進捗を標準エラーに出す
    #[arg(long)]
    progress: bool,

    /// 詳細ログの出力先
    #[arg(long)]
    verbose_log: Option<PathBuf>,
}

impl Args {
    fn load_board(&self) -> Result<Board> {
        if let Some(text) = &self.board {
            let codes = text
                .split(',')
                .map(|s| s.trim().parse::<i32>().with_context(|| format!("セルコードが数値ではありません: {:?}", s)))
                .collect::<Result<Vec<_>>>()?;
            return Board::from_codes(&codes).context("盤面の読み込みに失敗しました");
        }
        if self.random {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            return Ok(generator::random_board(&mut rng));
        }
        Ok(generator::fixed_board())
    }

    fn load_config(&self, board: &Board) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("設定ファイルを開けません: {}", path.display()))?;
                serde_json::from_str(&text).context("設定ファイルの JSON が不正です")?
            }
            None => SolverConfig::default().with_target(generator::default_target(board)),
        };

        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(axis) = self.axis {
            config.axis = match axis {
                AxisArg::Horizontal => Axis::Horizontal,
                AxisArg::Vertical => Axis::Vertical,
            };
        }
        if let Some(priority) = self.priority {
            config.priority = match priority {
                PriorityArg::MaxClusters => Priority::MaxClusters,
                PriorityArg::MinSteps => Priority::MinSteps,
            };
        }
        if self.chain {
            config.chain = true;
        }
        if self.no_diagonal {
            config.diagonal = false;
        }
        if let Some(v) = self.beam_width {
            config.beam_width = v;
        }
        if let Some(v) = self.max_steps {
            config.max_steps = v;
        }
        if let Some(v) = self.max_nodes {
            config.max_nodes = v;
        }
        config.validate().context("探索設定が不正です")?;
        Ok(config)
    }
}

fn run_with_progress(service: &SolverService, board: Board, config: SolverConfig) -> Result<SolveResult> {
    let handle = service.spawn(board, config);
    for msg in handle.progress().iter() {
        match msg {
            ProgressMessage::Started { max_steps, max_nodes } => {
                eprintln!("探索開始: 最大手数={} ノード上限={}", max_steps, max_nodes);
            }
            ProgressMessage::Step(p) => {
                eprintln!(
                    "step {}/{}: 候補={} nodes={} best={:?}",
                    p.step + 1,
                    p.max_steps,
                    p.candidates,
                    p.nodes_expanded,
                    p.best_clusters
                );
            }
            ProgressMessage::CacheHit { .. } => eprintln!("キャッシュヒット"),
            ProgressMessage::Completed { elapsed, .. } => {
                eprintln!("完了: {:.2}s", elapsed.as_secs_f64());
                break;
            }
            ProgressMessage::Error { message } => {
                eprintln!("エラー: {}", message);
                break;
            }
            ProgressMessage::Aborted { .. } => break,
        }
    }
    handle.join()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.verbose_log {
        logging::init_log_file(path)
            .with_context(|| format!("ログファイルを作成できません: {}", path.display()))?;
        logging::set_verbose(true);
    }

    let board = args.load_board()?;
    let config = args.load_config(&board)?;
    log::info!("盤面:\n{}", board);

    let service = SolverService::new();
    let result = if args.progress {
        run_with_progress(&service, board, config.clone())?
    } else {
        service.solve(&board, &config)?
    };
    if result.is_empty() {
        log::warn!("条件を満たす経路が見つかりませんでした");
    } else if !result.target_reached {
        log::info!("目標 {} コンボに届きませんでした（{} コンボ）", config.target, result.total_clusters);
    }

    let output = serde_json::json!({
        "board": board,
        "config": config,
        "result": result,
    });
    let text = serde_json::to_string_pretty(&output).map_err(|e| anyhow!("JSON 出力に失敗: {}", e))?;
    println!("{}", text);
    Ok(())
}
