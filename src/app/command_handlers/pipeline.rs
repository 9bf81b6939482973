use crate::app::command_support::{parse_options, render_report, PipelineContext};
use crate::corpus::{jobs_from_directory, jobs_from_rows, retain_prefix, CorpusWalker};
use crate::document::load_rows;

pub fn cmd_segment(args: &[String]) -> Result<String, String> {
    let options = parse_options(args)?;
    let ctx = PipelineContext::load(&options)?;
    let rows = load_rows(&ctx.settings.paths.rows).map_err(|e| e.to_string())?;
    let jobs = retain_prefix(jobs_from_rows(&rows, &ctx.log), ctx.input_prefix(&options));

    let segmenter = ctx.segmenter();
    let walker = CorpusWalker::new(ctx.settings.segmentation_walker()).with_log(ctx.log.clone());
    let report = walker
        .run_segmentation(jobs, |transcript| segmenter.segment_indexed(transcript))
        .map_err(|e| e.to_string())?;
    Ok(render_report("segment", &report))
}

pub fn cmd_classify(args: &[String]) -> Result<String, String> {
    let options = parse_options(args)?;
    let ctx = PipelineContext::load(&options)?;
    let jobs = jobs_from_directory(&ctx.settings.paths.segmented_dir, ctx.input_prefix(&options))
        .map_err(|e| e.to_string())?;
    if jobs.is_empty() {
        return Ok(format!(
            "no matching documents in {}",
            ctx.settings.paths.segmented_dir.display()
        ));
    }

    let segmenter = ctx.segmenter();
    let classifier = ctx.classifier()?;
    let walker =
        CorpusWalker::new(ctx.settings.classification_walker()).with_log(ctx.log.clone());
    let report = walker
        .run(
            jobs,
            |transcript| segmenter.segment_indexed(transcript),
            |segments, opponent| classifier.classify(segments, opponent),
        )
        .map_err(|e| e.to_string())?;
    Ok(render_report("classify", &report))
}

pub fn cmd_run(args: &[String]) -> Result<String, String> {
    let options = parse_options(args)?;
    let ctx = PipelineContext::load(&options)?;
    let rows = load_rows(&ctx.settings.paths.rows).map_err(|e| e.to_string())?;
    let jobs = retain_prefix(jobs_from_rows(&rows, &ctx.log), ctx.input_prefix(&options));

    let segmenter = ctx.segmenter();
    let classifier = ctx.classifier()?;
    let walker =
        CorpusWalker::new(ctx.settings.classification_walker()).with_log(ctx.log.clone());
    let report = walker
        .run(
            jobs,
            |transcript| segmenter.segment_indexed(transcript),
            |segments, opponent| classifier.classify(segments, opponent),
        )
        .map_err(|e| e.to_string())?;
    Ok(render_report("run", &report))
}
