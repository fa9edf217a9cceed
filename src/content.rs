//! Literal text of the Stack Othello guide.

/// One bullet line, optionally led by a bold label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulletLine {
    pub label: Option<&'static str>,
    pub text: &'static str,
}

impl BulletLine {
    const fn plain(text: &'static str) -> Self {
        Self { label: None, text }
    }

    const fn labeled(label: &'static str, text: &'static str) -> Self {
        Self {
            label: Some(label),
            text,
        }
    }
}

/// A subheading followed by its bullet lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subsection {
    pub title: &'static str,
    pub lines: &'static [BulletLine],
}

pub const BULLET: &str = "• ";

pub const TITLE: &str = "Stack Othello";

/// Metadata title of the rendered document.
pub const DOCUMENT_TITLE: &str = "Stack Othello 説明資料";

pub const OVERVIEW_HEADING: &str = "ゲーム概要";
pub const OVERVIEW: &str = "Stack Othelloは、伝統的なオセロゲームに「スタック（積み重ね）」機能を加えた、\
Unity製の3D物理ゲームです。駒を最大2段まで積み重ねることができ、\
より戦略的で奥深いゲーム体験を提供します。";

pub const FEATURES_HEADING: &str = "主要機能";
pub const FEATURES: [(&str, &str); 6] = [
    ("対戦モード", "2人対戦 / AI対戦（3段階の難易度）"),
    ("ボードサイズ", "4×4 / 6×6 / 8×8から選択可能"),
    ("スタック機能", "同じマスに最大2段まで駒を積み重ね可能"),
    ("物理エンジン", "Unity Physicsを使用したリアルな駒の落下・反応"),
    ("操作方式", "マウス操作 / キーボード操作の両方に対応"),
    ("日本語対応", "完全な日本語UI・ヘルプシステム"),
];
/// Widths of the label and description columns, in millimetres.
pub const FEATURE_COLUMN_WIDTHS_MM: [f64; 2] = [40.0, 125.0];

pub const RULES_HEADING: &str = "基本ルール";
pub const RULES_INTRO: &str = "オセロの基本ルールに加えて、スタック機能による追加ルールがあります。";
pub const RULES: [BulletLine; 9] = [
    BulletLine::plain("黒と白が交互に駒を置きます（黒が先手）"),
    BulletLine::plain("駒を置いて相手の駒を挟むと、挟まれた駒が自分の色にひっくり返ります"),
    BulletLine::plain("縦・横・斜めの8方向すべてで挟むことができます"),
    BulletLine::plain(
        "1つでも相手の駒を挟める場所にのみ置けます（置ける場所は緑色でハイライト表示）",
    ),
    BulletLine::labeled("スタック機能:", "同じ色の駒の上に最大2段まで積み重ねることができます"),
    BulletLine::plain("スタックされた駒は全体が一緒にひっくり返ります"),
    BulletLine::plain("置ける場所がない場合は自動的にパスとなり、相手の番になります"),
    BulletLine::plain("両方のプレイヤーが置けなくなったらゲーム終了"),
    BulletLine::plain("ゲーム終了時、駒の数が多い方が勝ちです（同数の場合は引き分け）"),
];

pub const CONTROLS_HEADING: &str = "操作方法";
pub const CONTROLS: [Subsection; 3] = [
    Subsection {
        title: "マウス操作",
        lines: &[
            BulletLine::plain("左クリック: 置ける場所（緑色ハイライト）をクリックして駒を置く"),
            BulletLine::plain("クリック位置: 盤面上の好きな場所にカーソルを移動"),
        ],
    },
    Subsection {
        title: "キーボード操作",
        lines: &[
            BulletLine::plain("矢印キー / WASD: カーソルを上下左右に移動"),
            BulletLine::plain("Enter / Space: カーソル位置に駒を置く"),
        ],
    },
    Subsection {
        title: "その他のキー",
        lines: &[
            BulletLine::plain("H キー: ヘルプを表示/非表示"),
            BulletLine::plain("M キー: ゲーム中にタイトル画面を再表示"),
        ],
    },
];

pub const GAME_MODES_HEADING: &str = "ゲームモード";
pub const GAME_MODES_INTRO: &str = "タイトル画面で対戦方式とボードサイズを選択できます。";
pub const GAME_MODES: [Subsection; 2] = [
    Subsection {
        title: "対戦モード",
        lines: &[
            BulletLine::labeled("2人対戦:", "同じPCで2人が交互にプレイ"),
            BulletLine::labeled("AI対戦:", "CPUと対戦（難易度: 簡単 / 普通 / 難しい）"),
        ],
    },
    Subsection {
        title: "ボードサイズ",
        lines: &[
            BulletLine::labeled("4×4:", "コンパクトで短時間で遊べる"),
            BulletLine::labeled("6×6:", "中規模でバランスの取れた対戦"),
            BulletLine::labeled("8×8:", "標準サイズで本格的な対戦"),
        ],
    },
];

/// Gap after the title, in millimetres.
pub const TITLE_GAP_MM: f64 = 10.0;
/// Gap closing each section, in millimetres.
pub const SECTION_GAP_MM: f64 = 5.0;
