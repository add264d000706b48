// ビーム探索 - 1回のなぞり操作の経路を探す

use std::collections::{BTreeMap, VecDeque};

use nohash_hasher::BuildNoHashHasher;

use super::config::{Priority, SolverConfig};
use super::result::SolveResult;
use super::scoring::{potential, score};
use super::state::{steps_of, DedupRecord, SearchState};
use crate::constants::{U64Map, COLS, PLAY_ROW_START, ROWS, STAGING_ROW};
use crate::domain::board::{Board, Cell, Marks, Pos, Restriction};
use crate::domain::chain::{evaluate, Evaluation};
use crate::error::SolveError;
use crate::vlog;

/// 各ステップ終了時の進捗
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepProgress {
    /// 0 始まりのステップ番号
    pub step: u32,
    pub max_steps: u32,
    /// 次のステップに渡す候補数（順位付け前）
    pub candidates: usize,
    pub nodes_expanded: u64,
    pub best_clusters: Option<u32>,
    pub best_score: Option<f64>,
}

/// 探索の外部フック（中断・進捗通知）
pub trait SearchObserver {
    /// ステップ開始ごとに確認される
    fn is_cancelled(&self) -> bool {
        false
    }

    fn on_step(&mut self, _progress: &StepProgress) {}
}

/// 何もしないオブザーバ
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// ビーム探索器
pub struct BeamSearch<'a> {
    board: Board,
    config: &'a SolverConfig,
    marks: Marks,
    max_nodes: u64,
}

impl<'a> BeamSearch<'a> {
    /// 設定と盤面のマークを検証して探索器を作る
    pub fn new(board: &Board, config: &'a SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        let marks = board.validate_marks()?;
        Ok(Self {
            board: *board,
            config,
            marks,
            max_nodes: config.effective_max_nodes(),
        })
    }

    pub fn max_nodes(&self) -> u64 {
        self.max_nodes
    }

    /// 探索を実行
    pub fn run<O: SearchObserver + ?Sized>(&self, observer: &mut O) -> Result<SolveResult, SolveError> {
        let config = self.config;
        let mut run = SearchRun::new(config, self.marks);
        let mut frontier = run.seed(&self.board);

        log::debug!(
            "ビーム探索開始: 初期状態={} 幅={} 最大手数={} ノード上限={} 優先={:?}",
            frontier.len(),
            config.beam_width,
            config.max_steps,
            self.max_nodes,
            config.priority
        );

        let mut search_steps = 0u32;
        let mut ran_out_of_steps = true;

        for step in 0..config.max_steps {
            if observer.is_cancelled() {
                log::debug!("ビーム探索中断: step={} nodes={}", step, run.nodes);
                let best = run
                    .best
                    .take()
                    .map(|best| Box::new(run.finish(best, search_steps, false)));
                return Err(SolveError::Cancelled { best });
            }
            search_steps = step + 1;

            let mut candidates: Vec<SearchState> = Vec::new();
            for state in &frontier {
                if run.nodes > self.max_nodes {
                    break;
                }

                // その場で止める場合も候補（最後の一歩専用マスはここでのみ採用される）
                run.consider(&state.eval, state.score, &state.path, None);

                if state.locked {
                    continue;
                }
                for &(dr, dc) in config.directions() {
                    let Some(next) = state.pos.offset(dr, dc) else {
                        continue;
                    };
                    run.expand(state, next, &mut candidates);
                }
            }

            observer.on_step(&StepProgress {
                step,
                max_steps: config.max_steps,
                candidates: candidates.len(),
                nodes_expanded: run.nodes,
                best_clusters: run.best.as_ref().map(|b| b.total_clusters),
                best_score: run.best.as_ref().map(|b| b.score),
            });
            vlog!(
                "[beam] step={} frontier={} candidates={} nodes={} best={:?}",
                step,
                frontier.len(),
                candidates.len(),
                run.nodes,
                run.best.as_ref().map(|b| (b.total_clusters, b.steps, b.score))
            );

            if candidates.is_empty() || run.nodes > self.max_nodes {
                ran_out_of_steps = false;
                break;
            }
            frontier = run.rank(candidates);
        }

        let exhausted = run.nodes > self.max_nodes || ran_out_of_steps;
        let result = match run.best.take() {
            Some(best) => run.finish(best, search_steps, exhausted),
            None => run.finish(SolveResult::empty(), search_steps, exhausted),
        };
        log::debug!(
            "ビーム探索終了: コンボ={} 手数={} nodes={} steps={} 打ち切り={}",
            result.total_clusters,
            result.steps,
            result.nodes_expanded,
            result.search_steps,
            result.budget_exhausted
        );
        Ok(result)
    }
}

/// 1回の探索が所有する作業領域
struct SearchRun<'a> {
    config: &'a SolverConfig,
    marks: Marks,
    best: Option<SolveResult>,
    visited: U64Map<DedupRecord>,
    nodes: u64,
}

impl<'a> SearchRun<'a> {
    fn new(config: &'a SolverConfig, marks: Marks) -> Self {
        Self {
            config,
            marks,
            best: None,
            visited: U64Map::with_hasher(BuildNoHashHasher::default()),
            nodes: 0,
        }
    }

    /// 評価・ポテンシャル・スコアをまとめて計算
    fn assess(&self, eval_board: &Board, steps: u32) -> (Evaluation, f64, f64) {
        let eval = evaluate(eval_board, self.config.chain);
        let pot = potential(eval_board, self.config.axis);
        let s = score(&eval, pot, steps, self.config);
        (eval, pot, s)
    }

    fn record(&self, eval: &Evaluation, potential: f64, steps: u32) -> DedupRecord {
        DedupRecord {
            axis_clusters: eval.axis_clusters(self.config.axis),
            clusters: eval.clusters,
            cleared: eval.cleared,
            potential,
            steps,
        }
    }

    /// 初期状態: 0行目を先に、続いて1..=5行目を行優先で
    fn seed(&mut self, board: &Board) -> Vec<SearchState> {
        let staging = (0..COLS).map(|c| Pos::new(STAGING_ROW, c));
        let play = (PLAY_ROW_START..ROWS).flat_map(|r| (0..COLS).map(move |c| Pos::new(r, c)));

        let mut frontier = Vec::new();
        for origin in staging.chain(play) {
            if self.marks.start.is_some_and(|start| start != origin) {
                continue;
            }
            let held = board.get(origin);
            if held.is_empty() || held.restriction == Restriction::Forbidden {
                continue;
            }

            let mut state_board = *board;
            let hole = if origin.is_staging() {
                None
            } else {
                state_board.set(origin, Cell::EMPTY);
                Some(origin)
            };
            let locked = held.restriction == Restriction::TerminalOnly;
            let mut state = SearchState::unscored(state_board, held, hole, vec![origin], locked);
            self.score_state(&mut state);

            let record = self.record(&state.eval, state.potential, 0);
            self.visited.insert(state.dedup_key(), record);
            frontier.push(state);
        }
        frontier
    }

    /// 穴を埋めた盤面で評価を埋める
    fn score_state(&self, state: &mut SearchState) {
        let (eval, pot, s) = self.assess(&state.eval_board(), state.steps());
        state.eval = eval;
        state.potential = pot;
        state.score = s;
    }

    /// 採用判定。`tail` は経路の末尾に足す終端マス
    fn consider(&mut self, eval: &Evaluation, score: f64, path: &[Pos], tail: Option<Pos>) {
        let last = tail.or_else(|| path.last().copied());
        if let Some(end) = self.marks.end {
            if last != Some(end) {
                return;
            }
        }
        let steps = steps_of(path) + u32::from(tail.is_some());
        let target = self.config.target;

        let better = match &self.best {
            None => true,
            Some(best) => match self.config.priority {
                Priority::MaxClusters => {
                    score > best.score || (score == best.score && eval.cleared > best.cleared)
                }
                Priority::MinSteps => {
                    if eval.meets(target) {
                        !best.target_reached || steps < best.steps
                    } else {
                        eval.clusters > best.total_clusters
                    }
                }
            },
        };
        if !better {
            return;
        }

        let mut full = Vec::with_capacity(path.len() + 1);
        full.extend_from_slice(path);
        full.extend(tail);
        self.best = Some(SolveResult::from_evaluation(eval, full, score, target));
    }

    /// 1方向への遷移
    fn expand(&mut self, state: &SearchState, next: Pos, candidates: &mut Vec<SearchState>) {
        let steps = state.steps() + 1;
        let dest = state.board.get(next);
        if dest.restriction == Restriction::Forbidden {
            return;
        }

        // 待機列から: 1行目にのみ降りられる。落下先の中身は盤外へ
        if state.pos.is_staging() {
            if next.r() != PLAY_ROW_START {
                return;
            }
            let mut board = state.board;
            board.set(next, Cell::EMPTY);
            self.push_candidate(state, board, next, dest, steps, candidates);
            return;
        }

        // 待機列へ戻る: そこで終了。盤面はそのまま
        if next.is_staging() {
            let s = score(&state.eval, state.potential, steps, self.config);
            self.consider(&state.eval, s, &state.path, Some(next));
            return;
        }

        let Some(hole) = state.hole else {
            return;
        };
        let mut board = state.board;
        board.set(hole, dest);
        board.set(next, Cell::EMPTY);
        self.push_candidate(state, board, next, dest, steps, candidates);
    }

    fn push_candidate(
        &mut self,
        state: &SearchState,
        board: Board,
        next: Pos,
        dest: Cell,
        steps: u32,
        candidates: &mut Vec<SearchState>,
    ) {
        let locked = dest.restriction == Restriction::TerminalOnly || self.marks.end == Some(next);
        let mut path = Vec::with_capacity(state.path.len() + 1);
        path.extend_from_slice(&state.path);
        path.push(next);

        let mut child = SearchState::unscored(board, state.held, Some(next), path, locked);
        self.score_state(&mut child);
        self.consider(&child.eval, child.score, &child.path, None);

        let key = child.dedup_key();
        let record = self.record(&child.eval, child.potential, steps);
        if let Some(prev) = self.visited.get(&key) {
            if prev.dominates(&record) {
                return;
            }
        }
        self.visited.insert(key, record);

        candidates.push(child);
        self.nodes += 1;
    }

    /// 候補を次のビームに絞る
    fn rank(&self, mut candidates: Vec<SearchState>) -> Vec<SearchState> {
        let width = self.config.beam_width;
        match self.config.priority {
            Priority::MaxClusters => {
                candidates.sort_by(|a, b| {
                    b.score
                        .total_cmp(&a.score)
                        .then_with(|| b.eval.cleared.cmp(&a.eval.cleared))
                        .then_with(|| a.path.len().cmp(&b.path.len()))
                });
                candidates.truncate(width);
                candidates
            }
            Priority::MinSteps => {
                // (方向コンボ, コンボ, 消去数) ごとに分け、上位から順番に1つずつ取る
                let axis = self.config.axis;
                let mut buckets: BTreeMap<(u32, u32, u32), Vec<SearchState>> = BTreeMap::new();
                for st in candidates {
                    let key = (st.eval.axis_clusters(axis), st.eval.clusters, st.eval.cleared);
                    buckets.entry(key).or_default().push(st);
                }
                let mut queues: Vec<VecDeque<SearchState>> = buckets
                    .into_values()
                    .rev()
                    .map(|mut bucket| {
                        bucket.sort_by(|a, b| b.score.total_cmp(&a.score));
                        VecDeque::from(bucket)
                    })
                    .collect();

                let mut beam = Vec::with_capacity(width);
                let mut i = 0usize;
                while beam.len() < width && !queues.is_empty() {
                    let idx = i % queues.len();
                    match queues[idx].pop_front() {
                        Some(st) => beam.push(st),
                        None => {
                            queues.remove(idx);
                        }
                    }
                    i += 1;
                }
                beam
            }
        }
    }

    /// メタデータを付けて結果を確定
    fn finish(&self, mut result: SolveResult, search_steps: u32, exhausted: bool) -> SolveResult {
        result.nodes_expanded = self.nodes;
        result.search_steps = search_steps;
        result.budget_exhausted = exhausted;
        result
    }
}

/// 盤面を解く（オブザーバなし）
pub fn solve(board: &Board, config: &SolverConfig) -> Result<SolveResult, SolveError> {
    BeamSearch::new(board, config)?.run(&mut NoopObserver)
}
