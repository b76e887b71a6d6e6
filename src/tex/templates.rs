// src/tex/templates.rs

//! Built-in LaTeX templates. Placeholders use the `??KEY??` form and are
//! filled by [`super::fill_template`]; unknown placeholders stay verbatim.

/// Outer document wrapping one or more statement/solution bodies.
pub const DOCUMENT_TEMPLATE: &str = r"\documentclass[11pt,a4paper]{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{amsmath,amssymb}
\usepackage{graphicx}
\usepackage{pdfpages}
\usepackage{fancyvrb}
\usepackage{xcolor}
\usepackage[margin=2.2cm]{geometry}
\usepackage{fancyhdr}

\pagestyle{fancy}
\fancyhead[L]{??CONTESTNAME??}
\fancyhead[R]{\thepage}
\fancyfoot{}

% Balloon dot shown next to the problem title.
\newcommand{\balloon}[1]{\textcolor[HTML]{#1}{\raisebox{-1pt}{\rule{9pt}{9pt}}}}

% Sample box: #1 is the path of the sample without extension; the files
% #1.in and #1.ans must exist next to the compiled document.
\newcommand{\sample}[1]{%
  \noindent
  \begin{minipage}[t]{0.48\textwidth}
    \textbf{Input}\\[2pt]
    \VerbatimInput[frame=single]{#1.in}
  \end{minipage}\hfill
  \begin{minipage}[t]{0.48\textwidth}
    \textbf{Output}\\[2pt]
    \VerbatimInput[frame=single]{#1.ans}
  \end{minipage}\par\vspace{6pt}
}

\newcommand{\sampleexplanation}[1]{\paragraph{Explanation.}#1\par\vspace{6pt}}

% Statements are laid out for double-sided printing.
\newcommand{\insertblankpageifnecessary}{%
  \clearpage
  \ifodd\value{page}\else\null\thispagestyle{empty}\clearpage\fi
}

\begin{document}
??DOCUMENTCONTENT??
\end{document}
";

/// Body of a single problem statement.
pub const STATEMENT_TEMPLATE: &str = r"\section*{Problem ??LABEL??. ??TITLE?? \hfill \balloon{??COLOR??}}
\noindent\textit{Time limit: ??TIMELIMIT?? s. Memory limit: ??MEMORYLIMIT?? MiB.}
\medskip

??LEGEND??

\subsection*{Input}
??INPUT??

\subsection*{Output}
??OUTPUT??
??INTERACTION??
\subsection*{Samples}
??SAMPLES??
";

/// Interaction section, spliced into the statement only when present.
pub const INTERACTION_SECTION: &str = r"
\subsection*{Interaction}
??INTERACTIONBODY??
";

/// Body of a single editorial entry.
pub const SOLUTION_TEMPLATE: &str = r"\section*{Problem ??LABEL??. ??TITLE?? \hfill \balloon{??COLOR??}}
\noindent\textit{Author: ??AUTHOR??. Preparation: ??PREPARATION??.}
\medskip

??SOLUTION??
";
