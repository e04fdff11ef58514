use std::fmt;

/// The four submit actions offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AnalyzeJob,
    MatchResume,
    Optimize,
    CoverLetter,
}

impl Operation {
    /// Every operation in display order.
    pub const ALL: [Operation; 4] = [
        Operation::AnalyzeJob,
        Operation::MatchResume,
        Operation::Optimize,
        Operation::CoverLetter,
    ];

    /// Endpoint path on the analysis service.
    pub fn path(self) -> &'static str {
        match self {
            Operation::AnalyzeJob => "/api/analyze-job",
            Operation::MatchResume => "/api/match-resume",
            Operation::Optimize => "/api/optimize",
            Operation::CoverLetter => "/api/generate-cover-letter",
        }
    }

    /// Job analysis only needs the job description; the rest also need a resume.
    pub fn requires_resume(self) -> bool {
        !matches!(self, Operation::AnalyzeJob)
    }

    /// Short command name, also used when parsing console input.
    pub fn command(self) -> &'static str {
        match self {
            Operation::AnalyzeJob => "analyze",
            Operation::MatchResume => "match",
            Operation::Optimize => "optimize",
            Operation::CoverLetter => "cover-letter",
        }
    }

    pub fn from_command(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.command().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn title(self) -> &'static str {
        match self {
            Operation::AnalyzeJob => "Job Analysis",
            Operation::MatchResume => "Resume Matching",
            Operation::Optimize => "Optimization",
            Operation::CoverLetter => "Cover Letter",
        }
    }

    /// Action label while idle.
    pub fn idle_label(self) -> &'static str {
        match self {
            Operation::AnalyzeJob => "Analyze Job",
            Operation::MatchResume => "Match Resume",
            Operation::Optimize => "Optimize Application",
            Operation::CoverLetter => "Generate Cover Letter",
        }
    }

    /// Action label while a submission is in flight.
    pub fn busy_label(self) -> &'static str {
        match self {
            Operation::AnalyzeJob => "Analyzing...",
            Operation::MatchResume => "Matching...",
            Operation::Optimize => "Optimizing...",
            Operation::CoverLetter => "Generating...",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}
